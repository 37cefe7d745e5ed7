//! Layout of a site's image archive on disk.
//!
//! ```text
//! <root>/<site>/YYYY/MM/<site>[_IR]_YYYY_MM_DD_HHMMSS.jpg
//! <root>/<site>/ROI/<site>_<roi>_roi.csv, masks, configs and series files
//! <root>/sites.toml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use crate::error::Result;
use crate::roi::RoiName;
use crate::timestamp::{image_prefix, parse_image_timestamp};

#[derive(Clone, Debug)]
pub struct Archive {
    pub root: PathBuf,
    pub site: String,
}

impl Archive {
    pub fn new(root: impl Into<PathBuf>, site: &str) -> Self {
        Self {
            root: root.into(),
            site: site.to_string(),
        }
    }

    pub fn site_dir(&self) -> PathBuf {
        self.root.join(&self.site)
    }

    pub fn roi_dir(&self) -> PathBuf {
        self.site_dir().join("ROI")
    }

    fn roi_file(&self, roi: &RoiName, suffix: &str) -> PathBuf {
        self.roi_dir().join(format!("{}_{}{}", self.site, roi, suffix))
    }

    pub fn roi_list_path(&self, roi: &RoiName) -> PathBuf {
        self.roi_file(roi, "_roi.csv")
    }

    pub fn config_path(&self, roi: &RoiName) -> PathBuf {
        self.roi_file(roi, ".cfg")
    }

    pub fn roistats_path(&self, roi: &RoiName, infrared: bool) -> PathBuf {
        if infrared {
            self.roi_file(roi, "_IR_roistats.csv")
        } else {
            self.roi_file(roi, "_roistats.csv")
        }
    }

    pub fn ndvi_path(&self, roi: &RoiName) -> PathBuf {
        self.roi_file(roi, "_ndvi.csv")
    }

    pub fn summary_path(&self, roi: &RoiName, nday: u32) -> PathBuf {
        self.roi_file(roi, &format!("_{nday}day.csv"))
    }

    pub fn ndvi_summary_path(&self, roi: &RoiName, nday: u32) -> PathBuf {
        self.roi_file(roi, &format!("_ndvi_{nday}day.csv"))
    }

    pub fn mask_path(&self, maskfile: &str) -> PathBuf {
        self.roi_dir().join(maskfile)
    }

    /// Local site metadata file shared by every site in the archive.
    pub fn site_info_path(&self) -> PathBuf {
        self.root.join("sites.toml")
    }

    /// Sorted image paths with timestamps in `[start, end]`.
    pub fn list_images(
        &self,
        infrared: bool,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<PathBuf>> {
        let site_dir = self.site_dir();
        if !site_dir.is_dir() {
            debug!(path = %site_dir.display(), "Site directory missing");
            return Ok(Vec::new());
        }

        let prefix = image_prefix(&self.site, infrared);
        let mut images = Vec::new();

        for (year, year_dir) in numbered_dirs(&site_dir, 4)? {
            if year < start.year() as u32 || year > end.year() as u32 {
                continue;
            }
            for (month, month_dir) in numbered_dirs(&year_dir, 2)? {
                if !(1..=12).contains(&month)
                    || (year == start.year() as u32 && month < start.month())
                    || (year == end.year() as u32 && month > end.month())
                {
                    continue;
                }
                let name_start = format!("{prefix}_{year:04}_{month:02}_");
                for entry in fs::read_dir(&month_dir)? {
                    let path = entry?.path();
                    if path.is_dir() {
                        continue;
                    }
                    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    if !name.starts_with(&name_start) || !name.ends_with(".jpg") {
                        continue;
                    }
                    let Ok(taken) = parse_image_timestamp(&self.site, name, infrared) else {
                        continue;
                    };
                    if taken >= start && taken <= end {
                        images.push(path);
                    }
                }
            }
        }

        images.sort();
        Ok(images)
    }
}

/// Subdirectories whose names are exactly `width` digits, with their value.
fn numbered_dirs(parent: &Path, width: usize) -> Result<Vec<(u32, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(parent)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.len() != width || !name.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(value) = name.parse() {
            dirs.push((value, path));
        }
    }
    Ok(dirs)
}
