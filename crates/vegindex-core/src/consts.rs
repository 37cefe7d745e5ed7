/// Width in pixels of the border excluded from the dark/bright image check.
pub const BRIGHTNESS_CHECK_BORDER: usize = 30;

/// Interior brightness (R+G+B) below which an image is treated as mostly dark.
pub const DARK_IMAGE_THRESHOLD: f64 = 30.0;

/// Interior brightness (R+G+B) above which an image is treated as mostly white.
pub const BRIGHT_IMAGE_THRESHOLD: f64 = 725.0;

/// Percentiles reported for every channel of a per-image row.
pub const CHANNEL_PERCENTILES: [f64; 7] = [5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0];

/// Quantiles reported for the aggregate metric of a summary row.
pub const SUMMARY_QUANTILES: [f64; 3] = [0.5, 0.75, 0.9];

/// Legacy no-data value found in older series files.
pub const LEGACY_NODATA: f64 = -9999.0;

/// Token written for a missing numeric field.
pub const ND_NUMBER: &str = "NA";

/// Token written for a missing string field.
pub const ND_STRING: &str = "None";

/// Maximum time difference when pairing an RGB image with an IR image.
pub const RGB_IR_MATCH_TOLERANCE_SECS: i64 = 600;

/// Luma weights used to estimate the visible contribution to the IR band.
pub const LUMA_R: f64 = 0.3;
pub const LUMA_G: f64 = 0.59;
pub const LUMA_B: f64 = 0.11;

/// Offset past the last persisted image where an update run resumes.
pub const UPDATE_RESUME_OFFSET_SECS: i64 = 5;

/// Current per-image series file format version.
pub const SERIES_FORMAT_VERSION: u32 = 1;

/// Default archive root when neither the CLI flag nor the environment sets one.
pub const DEFAULT_ARCHIVE_DIR: &str = "/data/archive";

/// Environment variable overriding the archive root.
pub const ARCHIVE_DIR_ENV: &str = "PHENOCAM_ARCHIVE_DIR";

/// Recognized vegetation type codes for ROI lists.
pub const ROI_TYPES: [&str; 23] = [
    "canopy", "deciduous", "coniferous", "grass", "shrub", "modis", "refpanel", "misc",
    "tundra", "AG", "DB", "DN", "EB", "EN", "GR", "MX", "NV", "RF", "SH", "TN", "UN", "WL", "XX",
];
