//! TIFF field types and tag name tables.
//!
//! Field types determine how a value is encoded; tag tables map numeric tag
//! IDs to human-readable names per namespace. Unknown IDs have no name and
//! are kept numeric by the directory decoder.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF 6.0 field types that determine how values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator, denominator
    SRational = 10,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong => 4,
            FieldType::Rational | FieldType::SRational => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            _ => None,
        }
    }

    /// Maximum bytes that can be stored inline in an IFD entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Check if `count` values of this type fit in the entry's value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.size_in_bytes() as u64 * count as u64 <= Self::INLINE_THRESHOLD as u64
    }
}

// =============================================================================
// Pointer Tags
// =============================================================================

/// IFD0 tag holding the offset of the Exif sub-IFD
pub const EXIF_IFD_POINTER: u16 = 0x8769;

/// IFD0 tag holding the offset of the GPS sub-IFD
pub const GPS_IFD_POINTER: u16 = 0x8825;

/// IFD0 or Exif tag holding the offset of the Interoperability sub-IFD
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

// =============================================================================
// Tag Namespaces
// =============================================================================

/// Tag ID namespaces. The same numeric ID means different things in
/// different directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagNamespace {
    /// IFD0, Exif sub-IFD and IFD1 (thumbnail)
    General,

    /// GPS sub-IFD
    Gps,

    /// Interoperability sub-IFD
    Interop,
}

impl TagNamespace {
    /// Look up the human-readable name of a tag.
    pub fn name(self, tag_id: u16) -> Option<&'static str> {
        match self {
            TagNamespace::General => general_tag_name(tag_id),
            TagNamespace::Gps => gps_tag_name(tag_id),
            TagNamespace::Interop => interop_tag_name(tag_id),
        }
    }
}

fn general_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x000B => "ProcessingSoftware",
        0x00FE => "NewSubfileType",
        0x00FF => "SubfileType",
        0x0100 => "ImageWidth",
        0x0101 => "ImageHeight",
        0x0102 => "BitsPerSample",
        0x0103 => "Compression",
        0x0106 => "PhotometricInterpretation",
        0x010A => "FillOrder",
        0x010D => "DocumentName",
        0x010E => "ImageDescription",
        0x010F => "Make",
        0x0110 => "Model",
        0x0111 => "StripOffsets",
        0x0112 => "Orientation",
        0x0115 => "SamplesPerPixel",
        0x0116 => "RowsPerStrip",
        0x0117 => "StripByteCounts",
        0x011A => "XResolution",
        0x011B => "YResolution",
        0x011C => "PlanarConfiguration",
        0x0128 => "ResolutionUnit",
        0x012D => "TransferFunction",
        0x0131 => "Software",
        0x0132 => "ModifyDate",
        0x013B => "Artist",
        0x013C => "HostComputer",
        0x013E => "WhitePoint",
        0x013F => "PrimaryChromaticities",
        0x0201 => "ThumbnailOffset",
        0x0202 => "ThumbnailLength",
        0x0211 => "YCbCrCoefficients",
        0x0212 => "YCbCrSubSampling",
        0x0213 => "YCbCrPositioning",
        0x0214 => "ReferenceBlackWhite",
        0x02BC => "ApplicationNotes",
        0x4746 => "Rating",
        0x4749 => "RatingPercent",
        0x8298 => "Copyright",
        0x829A => "ExposureTime",
        0x829D => "FNumber",
        0x83BB => "IPTC-NAA",
        0x8769 => "ExifIFDPointer",
        0x8773 => "ICC_Profile",
        0x8822 => "ExposureProgram",
        0x8824 => "SpectralSensitivity",
        0x8825 => "GPSInfoIFDPointer",
        0x8827 => "ISO",
        0x8830 => "SensitivityType",
        0x8832 => "RecommendedExposureIndex",
        0x9000 => "ExifVersion",
        0x9003 => "DateTimeOriginal",
        0x9004 => "CreateDate",
        0x9010 => "OffsetTime",
        0x9011 => "OffsetTimeOriginal",
        0x9012 => "OffsetTimeDigitized",
        0x9101 => "ComponentsConfiguration",
        0x9102 => "CompressedBitsPerPixel",
        0x9201 => "ShutterSpeedValue",
        0x9202 => "ApertureValue",
        0x9203 => "BrightnessValue",
        0x9204 => "ExposureCompensation",
        0x9205 => "MaxApertureValue",
        0x9206 => "SubjectDistance",
        0x9207 => "MeteringMode",
        0x9208 => "LightSource",
        0x9209 => "Flash",
        0x920A => "FocalLength",
        0x9214 => "SubjectArea",
        0x927C => "MakerNote",
        0x9286 => "UserComment",
        0x9290 => "SubSecTime",
        0x9291 => "SubSecTimeOriginal",
        0x9292 => "SubSecTimeDigitized",
        0xA000 => "FlashpixVersion",
        0xA001 => "ColorSpace",
        0xA002 => "ExifImageWidth",
        0xA003 => "ExifImageHeight",
        0xA004 => "RelatedSoundFile",
        0xA005 => "InteroperabilityIFDPointer",
        0xA20B => "FlashEnergy",
        0xA20E => "FocalPlaneXResolution",
        0xA20F => "FocalPlaneYResolution",
        0xA210 => "FocalPlaneResolutionUnit",
        0xA214 => "SubjectLocation",
        0xA215 => "ExposureIndex",
        0xA217 => "SensingMethod",
        0xA300 => "FileSource",
        0xA301 => "SceneType",
        0xA302 => "CFAPattern",
        0xA401 => "CustomRendered",
        0xA402 => "ExposureMode",
        0xA403 => "WhiteBalance",
        0xA404 => "DigitalZoomRatio",
        0xA405 => "FocalLengthIn35mmFormat",
        0xA406 => "SceneCaptureType",
        0xA407 => "GainControl",
        0xA408 => "Contrast",
        0xA409 => "Saturation",
        0xA40A => "Sharpness",
        0xA40B => "DeviceSettingDescription",
        0xA40C => "SubjectDistanceRange",
        0xA420 => "ImageUniqueID",
        0xA430 => "OwnerName",
        0xA431 => "SerialNumber",
        0xA432 => "LensInfo",
        0xA433 => "LensMake",
        0xA434 => "LensModel",
        0xA435 => "LensSerialNumber",
        0xA500 => "Gamma",
        _ => return None,
    };
    Some(name)
}

fn gps_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x0000 => "GPSVersionID",
        0x0001 => "GPSLatitudeRef",
        0x0002 => "GPSLatitude",
        0x0003 => "GPSLongitudeRef",
        0x0004 => "GPSLongitude",
        0x0005 => "GPSAltitudeRef",
        0x0006 => "GPSAltitude",
        0x0007 => "GPSTimeStamp",
        0x0008 => "GPSSatellites",
        0x0009 => "GPSStatus",
        0x000A => "GPSMeasureMode",
        0x000B => "GPSDOP",
        0x000C => "GPSSpeedRef",
        0x000D => "GPSSpeed",
        0x000E => "GPSTrackRef",
        0x000F => "GPSTrack",
        0x0010 => "GPSImgDirectionRef",
        0x0011 => "GPSImgDirection",
        0x0012 => "GPSMapDatum",
        0x0013 => "GPSDestLatitudeRef",
        0x0014 => "GPSDestLatitude",
        0x0015 => "GPSDestLongitudeRef",
        0x0016 => "GPSDestLongitude",
        0x0017 => "GPSDestBearingRef",
        0x0018 => "GPSDestBearing",
        0x0019 => "GPSDestDistanceRef",
        0x001A => "GPSDestDistance",
        0x001B => "GPSProcessingMethod",
        0x001C => "GPSAreaInformation",
        0x001D => "GPSDateStamp",
        0x001E => "GPSDifferential",
        0x001F => "GPSHPositioningError",
        _ => return None,
    };
    Some(name)
}

fn interop_tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x0001 => "InteropIndex",
        0x0002 => "InteropVersion",
        0x1000 => "RelatedImageFileFormat",
        0x1001 => "RelatedImageWidth",
        0x1002 => "RelatedImageHeight",
        _ => return None,
    };
    Some(name)
}
