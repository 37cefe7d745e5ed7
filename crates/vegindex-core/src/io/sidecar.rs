//! `.meta` sidecar files written next to archive images.
//!
//! Each line is `key=value`; only `exposure` and `balance` are used.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::nodata::parse_int;

/// Camera settings recorded for one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageMeta {
    pub exposure: Option<i64>,
    /// Auto white balance flag (`balance` key).
    pub awbflag: Option<i64>,
}

/// Path of the sidecar for an image: same basename, `.meta` extension.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("meta")
}

/// Parse sidecar text.
pub fn parse_meta(text: &str) -> ImageMeta {
    let mut meta = ImageMeta::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "exposure" => meta.exposure = parse_int(value),
            "balance" => meta.awbflag = parse_int(value),
            _ => {}
        }
    }
    meta
}

/// Read the sidecar for an image. A missing or unreadable file gives empty
/// metadata.
pub fn read_image_meta(image_path: &Path) -> ImageMeta {
    let path = sidecar_path(image_path);
    match fs::read_to_string(&path) {
        Ok(text) => parse_meta(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No image metadata");
            ImageMeta::default()
        }
    }
}
