//! Format-level integration tests.
//!
//! Tests verify:
//! - TIFF blocks decode identically in little-endian and big-endian order
//! - Every field type decodes to the expected raw value
//! - JPEG segments are located by marker and identifier
//! - IPTC, XMP and ICC payloads decode from real container layouts

use exif_streamer::format::segment::is_jpeg;
use exif_streamer::metadata::Output;
use exif_streamer::{locate, parse_buffer, Options, SegmentKind, TagMap, Value};

use super::test_utils::{
    approx_eq, create_camera_tiff, create_icc_header, ByteOrderType, JpegBuilder, TiffBuilder,
};

fn raw_nested(data: &[u8]) -> Output {
    let options = Options::all()
        .with_post_process(false)
        .with_merge_output(false);
    let report = parse_buffer(data, &options);
    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
    report.output.expect("metadata should be present")
}

fn image_tags(output: &Output) -> &TagMap {
    output.nested().and_then(|b| b.image.as_ref()).unwrap()
}

// =============================================================================
// TIFF Byte Order Tests
// =============================================================================

#[test]
fn test_little_endian_tiff() {
    let tiff = create_camera_tiff(ByteOrderType::LittleEndian);
    assert_eq!(&tiff[..4], &[b'I', b'I', 42, 0]);

    let output = raw_nested(&tiff);
    let image = image_tags(&output);
    assert_eq!(image.get("Make"), Some(&Value::Text("Canon".into())));
    assert_eq!(image.get("Orientation"), Some(&Value::Unsigned(1)));
}

#[test]
fn test_big_endian_tiff() {
    let tiff = create_camera_tiff(ByteOrderType::BigEndian);
    assert_eq!(&tiff[..4], &[b'M', b'M', 0, 42]);

    let output = raw_nested(&tiff);
    let image = image_tags(&output);
    assert_eq!(image.get("Model"), Some(&Value::Text("Canon EOS 5D".into())));
    assert_eq!(image.get("Orientation"), Some(&Value::Unsigned(1)));
}

#[test]
fn test_byte_orders_decode_identically() {
    let le = parse_buffer(
        &create_camera_tiff(ByteOrderType::LittleEndian),
        &Options::all(),
    );
    let be = parse_buffer(
        &create_camera_tiff(ByteOrderType::BigEndian),
        &Options::all(),
    );

    assert!(le.output.is_some());
    assert_eq!(le, be);
}

// =============================================================================
// Field Type Tests
// =============================================================================

#[test]
fn test_raw_field_types() {
    let output = raw_nested(&create_camera_tiff(ByteOrderType::BigEndian));
    let blocks = output.nested().unwrap();

    let exif = blocks.exif.as_ref().unwrap();
    assert_eq!(exif.get("ExposureTime"), Some(&Value::Float(0.005)));
    assert_eq!(exif.get("ISO"), Some(&Value::Unsigned(400)));
    assert_eq!(exif.get("ExifVersion"), Some(&Value::Bytes(b"0230".to_vec())));
    assert_eq!(
        exif.get("DateTimeOriginal"),
        Some(&Value::Text("2019:06:01 12:30:05".into()))
    );
    let compensation = exif.get("ExposureCompensation").and_then(Value::as_f64);
    assert!(approx_eq(compensation.unwrap(), -1.0 / 3.0));

    let gps = blocks.gps.as_ref().unwrap();
    assert_eq!(
        gps.get("GPSVersionID"),
        Some(&Value::Array(vec![
            Value::Unsigned(2),
            Value::Unsigned(3),
            Value::Unsigned(0),
            Value::Unsigned(0),
        ]))
    );
    assert_eq!(
        gps.get("GPSLatitude"),
        Some(&Value::Array(vec![
            Value::Float(40.0),
            Value::Float(26.0),
            Value::Float(46.0),
        ]))
    );
}

#[test]
fn test_signed_short() {
    let mut builder = TiffBuilder::new(ByteOrderType::LittleEndian);
    builder.ifd0().add_sshort(0x9201, -7);
    let tiff = builder.build();

    // 0x9201 is an Exif tag, but IFD0 shares the general namespace
    let output = raw_nested(&tiff);
    assert_eq!(
        image_tags(&output).get("ShutterSpeedValue"),
        Some(&Value::Signed(-7))
    );
}

#[test]
fn test_raw_mode_keeps_pointer_tags() {
    let output = raw_nested(&create_camera_tiff(ByteOrderType::LittleEndian));
    let image = image_tags(&output);

    assert!(image.contains("ExifIFDPointer"));
    assert!(image.contains("GPSInfoIFDPointer"));
}

#[test]
fn test_unknown_tag_keeps_numeric_id() {
    let mut builder = TiffBuilder::new(ByteOrderType::LittleEndian);
    builder.ifd0().add_short(0xC0DE, 5);

    let output = raw_nested(&builder.build());
    assert_eq!(image_tags(&output).get_by_id(0xC0DE), Some(&Value::Unsigned(5)));
}

// =============================================================================
// Segment Location Tests
// =============================================================================

#[test]
fn test_locate_segments_in_jpeg() {
    let tiff = create_camera_tiff(ByteOrderType::LittleEndian);
    let xml = "<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"></x:xmpmeta>";
    let profile = create_icc_header();
    let data = JpegBuilder::new()
        .jfif()
        .exif(&tiff)
        .xmp(xml)
        .iptc(&[(5, b"Title")])
        .icc(&profile)
        .build();
    assert!(is_jpeg(&data));

    let exif = locate(&data, SegmentKind::Tiff).unwrap();
    assert_eq!(exif.size, Some(tiff.len()));
    assert_eq!(&data[exif.start..exif.start + 4], &tiff[..4]);

    let xmp = locate(&data, SegmentKind::Xmp).unwrap();
    let end = xmp.end().unwrap();
    assert!(data[xmp.start..end].starts_with(b"http://ns.adobe.com/xap/1.0/"));
    assert!(data[xmp.start..end].ends_with(xml.as_bytes()));

    let iptc = locate(&data, SegmentKind::Iptc).unwrap();
    assert_eq!(iptc.size, Some(10));
    assert_eq!(&data[iptc.start..iptc.start + 3], &[0x1C, 0x02, 5]);

    let icc = locate(&data, SegmentKind::Icc).unwrap();
    assert_eq!(icc.size, Some(profile.len()));
    assert_eq!(&data[icc.start..icc.start + 4], &3144u32.to_be_bytes());
}

#[test]
fn test_bare_tiff_starts_at_zero() {
    let tiff = create_camera_tiff(ByteOrderType::BigEndian);

    let range = locate(&tiff, SegmentKind::Tiff).unwrap();
    assert_eq!(range.start, 0);
    assert_eq!(range.size, None);
    assert!(!is_jpeg(&tiff));
}

#[test]
fn test_absent_segments() {
    let data = JpegBuilder::new().jfif().padding(64).build();

    for kind in [
        SegmentKind::Tiff,
        SegmentKind::Xmp,
        SegmentKind::Iptc,
        SegmentKind::Icc,
    ] {
        assert_eq!(locate(&data, kind), None, "{:?}", kind);
    }
    assert_eq!(parse_buffer(&data, &Options::all()).output, None);
}

// =============================================================================
// IPTC / XMP / ICC Tests
// =============================================================================

#[test]
fn test_iptc_datasets() {
    let data = JpegBuilder::new()
        .iptc(&[
            (0, &[0x00, 0x04]),
            (5, b"Sunset"),
            (25, b"beach"),
            (25, b"sea"),
            (80, b"Jane Doe"),
        ])
        .build();

    let options = Options::default().with_tiff(false).with_iptc(true);
    let report = parse_buffer(&data, &options);
    let tags = report.output.as_ref().and_then(Output::merged).unwrap();

    assert_eq!(tags.get("ApplicationRecordVersion"), Some(&Value::Unsigned(4)));
    assert_eq!(tags.get("ObjectName"), Some(&Value::Text("Sunset".into())));
    assert_eq!(tags.get("Byline"), Some(&Value::Text("Jane Doe".into())));
    assert_eq!(
        tags.get("Keywords"),
        Some(&Value::Array(vec![
            Value::Text("beach".into()),
            Value::Text("sea".into()),
        ]))
    );
}

#[test]
fn test_xmp_is_trimmed_to_markup() {
    let xml = "<?xpacket begin=\"\"?><x:xmpmeta>photo</x:xmpmeta><?xpacket end=\"w\"?>";
    let data = JpegBuilder::new().xmp(&format!("{}\n   \0", xml)).build();

    let options = Options::default().with_xmp(true);
    let report = parse_buffer(&data, &options);
    let output = report.output.unwrap();

    assert_eq!(
        output.xmp(),
        Some(&exif_streamer::Xmp::Raw(xml.to_string()))
    );
}

#[test]
fn test_icc_header_fields() {
    let data = JpegBuilder::new().icc(&create_icc_header()).build();

    let options = Options::default().with_icc(true);
    let report = parse_buffer(&data, &options);
    let icc = report.output.as_ref().and_then(Output::icc).unwrap();

    assert_eq!(icc.len(), 12);
    assert_eq!(icc.get("ProfileSize"), Some(&Value::Unsigned(3144)));
    assert_eq!(icc.get("ProfileCMMType"), Some(&Value::Text("Lino".into())));
    assert_eq!(icc.get("ProfileVersion"), Some(&Value::Text("2.1.0".into())));
    assert_eq!(
        icc.get("ProfileClass"),
        Some(&Value::Text("Display Device profile".into()))
    );
    assert_eq!(icc.get("ColorSpaceData"), Some(&Value::Text("RGB".into())));
    assert_eq!(
        icc.get("PrimaryPlatform"),
        Some(&Value::Text("Microsoft Corporation".into()))
    );
    assert_eq!(icc.get("DeviceModel"), Some(&Value::Text("sRGB".into())));
    assert_eq!(icc.get("RenderingIntent"), Some(&Value::Text("Perceptual".into())));

    let date = icc.get("ProfileDateTime").unwrap();
    assert_eq!(
        serde_json::to_value(date).unwrap(),
        serde_json::json!("1998-02-09T06:49:00")
    );
}
