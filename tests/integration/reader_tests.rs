//! Range-based reading tests.
//!
//! Tests verify:
//! - Only the metadata segments are fetched from a large file
//! - Incremental reads produce the same report as a full-buffer parse
//! - File-backed and base64 sources work end to end

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use exif_streamer::metadata::Output;
use exif_streamer::{
    parse_buffer, FileRangeReader, IoError, MemoryRangeReader, MetadataReader, Options, Value,
};

use super::test_utils::{
    create_camera_tiff, create_icc_header, ByteOrderType, JpegBuilder, TrackingMockReader,
};

const PADDING: usize = 200_000;

fn large_jpeg() -> Vec<u8> {
    JpegBuilder::new()
        .jfif()
        .exif(&create_camera_tiff(ByteOrderType::LittleEndian))
        .padding(PADDING)
        .build()
}

// =============================================================================
// Request Tracking
// =============================================================================

#[tokio::test]
async fn test_reads_only_metadata_prefix() {
    let data = large_jpeg();
    let expected = parse_buffer(&data, &Options::default());

    let reader = TrackingMockReader::new(data, "mem://large.jpg");
    let metadata = MetadataReader::new(reader.clone(), Options::default());
    let report = metadata.read().await.unwrap();

    assert_eq!(report, expected);
    let tags = report.output.as_ref().and_then(Output::merged).unwrap();
    assert_eq!(tags.get("Make"), Some(&Value::Text("Canon".into())));

    // First chunk, then the rest of the EXIF segment
    let requests = reader.get_requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], (0, 512));
    assert_eq!(requests[1].0, 512);
    assert!(reader.bytes_read().await < 2048);
}

#[tokio::test]
async fn test_large_first_chunk_needs_one_request() {
    let reader = TrackingMockReader::new(large_jpeg(), "mem://large.jpg");
    let options = Options::default().with_first_chunk_size(4096);
    let metadata = MetadataReader::new(reader.clone(), options);

    let report = metadata.read().await.unwrap();
    assert!(report.output.is_some());
    assert_eq!(reader.request_count(), 1);
    assert_eq!(reader.get_requests().await, vec![(0, 4096)]);
}

#[tokio::test]
async fn test_missing_segment_loads_whole_file() {
    let data = large_jpeg();
    let size = data.len();

    let reader = TrackingMockReader::new(data, "mem://large.jpg");
    let options = Options::default().with_icc(true);
    let metadata = MetadataReader::new(reader.clone(), options);

    let report = metadata.read().await.unwrap();
    assert!(report.output.as_ref().and_then(Output::icc).is_none());
    assert_eq!(reader.bytes_read().await, size);
}

#[tokio::test]
async fn test_all_blocks_match_full_parse() {
    let data = JpegBuilder::new()
        .jfif()
        .exif(&create_camera_tiff(ByteOrderType::BigEndian))
        .xmp("<x:xmpmeta>range</x:xmpmeta>")
        .iptc(&[(25, b"one"), (25, b"two")])
        .icc(&create_icc_header())
        .padding(PADDING)
        .build();
    let size = data.len();

    // Every segment sits inside the first chunk
    let options = Options::all()
        .with_merge_output(false)
        .with_first_chunk_size(2048);
    let expected = parse_buffer(&data, &options);
    assert!(expected.errors.is_empty());

    let reader = TrackingMockReader::new(data, "mem://all.jpg");
    let metadata = MetadataReader::new(reader.clone(), options);
    let report = metadata.read().await.unwrap();

    assert_eq!(report, expected);
    assert_eq!(reader.request_count(), 1);
    assert!(reader.bytes_read().await < size);
}

#[tokio::test]
async fn test_non_image_data() {
    let reader = TrackingMockReader::new(vec![0x42; 1000], "mem://noise");
    let metadata = MetadataReader::new(reader, Options::all());

    let report = metadata.read().await.unwrap();
    assert_eq!(report.output, None);
    assert!(!report.failed());
}

// =============================================================================
// Sources
// =============================================================================

#[tokio::test]
async fn test_file_source() {
    let data = large_jpeg();
    let expected = parse_buffer(&data, &Options::default());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let reader = FileRangeReader::open(file.path()).await.unwrap();
    let report = MetadataReader::new(reader, Options::default())
        .read()
        .await
        .unwrap();

    assert_eq!(report, expected);
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = FileRangeReader::open(dir.path().join("absent.jpg")).await;

    assert!(matches!(result, Err(IoError::NotFound(_))));
}

#[tokio::test]
async fn test_base64_source() {
    let data = JpegBuilder::new()
        .exif(&create_camera_tiff(ByteOrderType::LittleEndian))
        .build();
    let expected = parse_buffer(&data, &Options::default());

    let plain = STANDARD.encode(&data);
    let data_url = format!("data:image/jpeg;base64,{}", plain);

    for input in [plain, data_url] {
        let reader = MemoryRangeReader::from_base64(&input).unwrap();
        let report = MetadataReader::new(reader, Options::default())
            .read()
            .await
            .unwrap();
        assert_eq!(report, expected);
    }
}

#[test]
fn test_invalid_base64() {
    let result = MemoryRangeReader::from_base64("not base64 at all!");
    assert!(matches!(result, Err(IoError::InvalidBase64(_))));
}
