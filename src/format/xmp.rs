//! XMP packet extraction.
//!
//! The APP1 payload starts with the namespace URI, a NUL and then the XML
//! packet. The packet is returned as text trimmed to the outermost tags;
//! structural XML parsing is left to a caller-supplied hook.

use crate::format::segment::SegmentRange;

/// Extract the XML text of the XMP segment in `range`.
///
/// Returns `None` when the segment holds no markup.
pub fn extract_xmp(data: &[u8], range: SegmentRange) -> Option<String> {
    let end = range.end().unwrap_or(data.len()).min(data.len());
    let bytes = data.get(range.start..end)?;

    let text = String::from_utf8_lossy(bytes);
    let first = text.find('<')?;
    let last = text.rfind('>')?;
    if last < first {
        return None;
    }

    Some(text[first..=last].to_string())
}
