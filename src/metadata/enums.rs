//! Human-readable names for enumerated tag values.
//!
//! Tables are keyed by tag name, then by code. A code missing from a table
//! is left untouched by the caller.

/// Name of a numeric code for `tag`.
pub fn describe(tag: &str, code: u32) -> Option<&'static str> {
    let name = match (tag, code) {
        ("Orientation", 1) => "Horizontal (normal)",
        ("Orientation", 2) => "Mirror horizontal",
        ("Orientation", 3) => "Rotate 180",
        ("Orientation", 4) => "Mirror vertical",
        ("Orientation", 5) => "Mirror horizontal and rotate 270 CW",
        ("Orientation", 6) => "Rotate 90 CW",
        ("Orientation", 7) => "Mirror horizontal and rotate 90 CW",
        ("Orientation", 8) => "Rotate 270 CW",

        ("ResolutionUnit" | "FocalPlaneResolutionUnit", 1) => "None",
        ("ResolutionUnit" | "FocalPlaneResolutionUnit", 2) => "inches",
        ("ResolutionUnit" | "FocalPlaneResolutionUnit", 3) => "cm",

        ("Compression", 1) => "Uncompressed",
        ("Compression", 2) => "CCITT 1D",
        ("Compression", 3) => "T4/Group 3 Fax",
        ("Compression", 4) => "T6/Group 4 Fax",
        ("Compression", 5) => "LZW",
        ("Compression", 6) => "JPEG (old-style)",
        ("Compression", 7) => "JPEG",
        ("Compression", 8) => "Adobe Deflate",
        ("Compression", 32773) => "PackBits",

        ("ExposureProgram", 0) => "Not Defined",
        ("ExposureProgram", 1) => "Manual",
        ("ExposureProgram", 2) => "Program AE",
        ("ExposureProgram", 3) => "Aperture-priority AE",
        ("ExposureProgram", 4) => "Shutter speed priority AE",
        ("ExposureProgram", 5) => "Creative (Slow speed)",
        ("ExposureProgram", 6) => "Action (High speed)",
        ("ExposureProgram", 7) => "Portrait",
        ("ExposureProgram", 8) => "Landscape",
        ("ExposureProgram", 9) => "Bulb",

        ("MeteringMode", 0) => "Unknown",
        ("MeteringMode", 1) => "Average",
        ("MeteringMode", 2) => "CenterWeightedAverage",
        ("MeteringMode", 3) => "Spot",
        ("MeteringMode", 4) => "MultiSpot",
        ("MeteringMode", 5) => "Pattern",
        ("MeteringMode", 6) => "Partial",
        ("MeteringMode", 255) => "Other",

        ("LightSource", 0) => "Unknown",
        ("LightSource", 1) => "Daylight",
        ("LightSource", 2) => "Fluorescent",
        ("LightSource", 3) => "Tungsten (incandescent light)",
        ("LightSource", 4) => "Flash",
        ("LightSource", 9) => "Fine weather",
        ("LightSource", 10) => "Cloudy weather",
        ("LightSource", 11) => "Shade",
        ("LightSource", 12) => "Daylight fluorescent (D 5700 - 7100K)",
        ("LightSource", 13) => "Day white fluorescent (N 4600 - 5400K)",
        ("LightSource", 14) => "Cool white fluorescent (W 3900 - 4500K)",
        ("LightSource", 15) => "White fluorescent (WW 3200 - 3700K)",
        ("LightSource", 17) => "Standard light A",
        ("LightSource", 18) => "Standard light B",
        ("LightSource", 19) => "Standard light C",
        ("LightSource", 20) => "D55",
        ("LightSource", 21) => "D65",
        ("LightSource", 22) => "D75",
        ("LightSource", 23) => "D50",
        ("LightSource", 24) => "ISO studio tungsten",
        ("LightSource", 255) => "Other",

        ("Flash", 0x00) => "Flash did not fire",
        ("Flash", 0x01) => "Flash fired",
        ("Flash", 0x05) => "Strobe return light not detected",
        ("Flash", 0x07) => "Strobe return light detected",
        ("Flash", 0x09) => "Flash fired, compulsory flash mode",
        ("Flash", 0x0D) => "Flash fired, compulsory flash mode, return light not detected",
        ("Flash", 0x0F) => "Flash fired, compulsory flash mode, return light detected",
        ("Flash", 0x10) => "Flash did not fire, compulsory flash mode",
        ("Flash", 0x18) => "Flash did not fire, auto mode",
        ("Flash", 0x19) => "Flash fired, auto mode",
        ("Flash", 0x1D) => "Flash fired, auto mode, return light not detected",
        ("Flash", 0x1F) => "Flash fired, auto mode, return light detected",
        ("Flash", 0x20) => "No flash function",
        ("Flash", 0x41) => "Flash fired, red-eye reduction mode",
        ("Flash", 0x45) => "Flash fired, red-eye reduction mode, return light not detected",
        ("Flash", 0x47) => "Flash fired, red-eye reduction mode, return light detected",
        ("Flash", 0x49) => "Flash fired, compulsory flash mode, red-eye reduction mode",
        ("Flash", 0x4D) => {
            "Flash fired, compulsory flash mode, red-eye reduction mode, return light not detected"
        }
        ("Flash", 0x4F) => {
            "Flash fired, compulsory flash mode, red-eye reduction mode, return light detected"
        }
        ("Flash", 0x59) => "Flash fired, auto mode, red-eye reduction mode",
        ("Flash", 0x5D) => "Flash fired, auto mode, return light not detected, red-eye reduction mode",
        ("Flash", 0x5F) => "Flash fired, auto mode, return light detected, red-eye reduction mode",

        ("SensingMethod", 1) => "Not defined",
        ("SensingMethod", 2) => "One-chip color area sensor",
        ("SensingMethod", 3) => "Two-chip color area sensor",
        ("SensingMethod", 4) => "Three-chip color area sensor",
        ("SensingMethod", 5) => "Color sequential area sensor",
        ("SensingMethod", 7) => "Trilinear sensor",
        ("SensingMethod", 8) => "Color sequential linear sensor",

        ("ColorSpace", 1) => "sRGB",
        ("ColorSpace", 2) => "Adobe RGB",
        ("ColorSpace", 0xFFFD) => "Wide Gamut RGB",
        ("ColorSpace", 0xFFFE) => "ICC Profile",
        ("ColorSpace", 0xFFFF) => "Uncalibrated",

        ("CustomRendered", 0) => "Normal",
        ("CustomRendered", 1) => "Custom",

        ("ExposureMode", 0) => "Auto",
        ("ExposureMode", 1) => "Manual",
        ("ExposureMode", 2) => "Auto bracket",

        ("WhiteBalance", 0) => "Auto",
        ("WhiteBalance", 1) => "Manual",

        ("SceneCaptureType", 0) => "Standard",
        ("SceneCaptureType", 1) => "Landscape",
        ("SceneCaptureType", 2) => "Portrait",
        ("SceneCaptureType", 3) => "Night",

        ("GainControl", 0) => "None",
        ("GainControl", 1) => "Low gain up",
        ("GainControl", 2) => "High gain up",
        ("GainControl", 3) => "Low gain down",
        ("GainControl", 4) => "High gain down",

        ("Contrast" | "Sharpness", 0) => "Normal",
        ("Contrast" | "Sharpness", 1) => "Soft",
        ("Contrast" | "Sharpness", 2) => "Hard",

        ("Saturation", 0) => "Normal",
        ("Saturation", 1) => "Low",
        ("Saturation", 2) => "High",

        ("SubjectDistanceRange", 0) => "Unknown",
        ("SubjectDistanceRange", 1) => "Macro",
        ("SubjectDistanceRange", 2) => "Close",
        ("SubjectDistanceRange", 3) => "Distant",

        ("FileSource", 1) => "Film Scanner",
        ("FileSource", 2) => "Reflection Print Scanner",
        ("FileSource", 3) => "Digital Camera",

        ("SceneType", 1) => "Directly photographed",

        ("GPSAltitudeRef", 0) => "Above Sea Level",
        ("GPSAltitudeRef", 1) => "Below Sea Level",

        _ => return None,
    };
    Some(name)
}

/// Name of a text code for `tag`.
pub fn describe_text(tag: &str, code: &str) -> Option<&'static str> {
    let name = match (tag, code) {
        ("GPSStatus", "A") => "Measurement in progress",
        ("GPSStatus", "V") => "Measurement Interoperability",
        ("GPSMeasureMode", "2") => "2-Dimensional Measurement",
        ("GPSMeasureMode", "3") => "3-Dimensional Measurement",
        _ => return None,
    };
    Some(name)
}

/// Name of one component in ComponentsConfiguration.
pub fn component(code: u8) -> Option<&'static str> {
    let name = match code {
        0 => "-",
        1 => "Y",
        2 => "Cb",
        3 => "Cr",
        4 => "R",
        5 => "G",
        6 => "B",
        _ => return None,
    };
    Some(name)
}
