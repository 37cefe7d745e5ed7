use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VegIndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskMismatch {
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Region of interest contains no unmasked pixels")]
    EmptyRegion,

    #[error("Cannot parse timestamp from filename: {0}")]
    InvalidFilename(String),

    #[error("Unknown vegetation type: {0}")]
    UnknownVegType(String),

    #[error("Invalid ROI name: {0} (expected e.g. DB_0001)")]
    InvalidRoiName(String),

    #[error("Invalid ROI list: {}", format_interval_errors(.0))]
    InvalidRoiList(Vec<IntervalError>),

    #[error("{}:{line}: {message}", path.display())]
    MalformedSeries {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Required file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("{param} mismatch: summary file has {recorded}, config has {configured}")]
    ParameterMismatch {
        param: &'static str,
        recorded: String,
        configured: String,
    },
}

/// A single ROI list validation failure. `mask` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalError {
    pub mask: usize,
    pub message: &'static str,
}

fn format_interval_errors(errors: &[IntervalError]) -> String {
    errors
        .iter()
        .map(|e| format!("mask {}: {}", e.mask, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, VegIndexError>;
