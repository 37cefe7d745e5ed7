pub mod solar;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

pub use solar::{SolarElevation, SpaSolarPosition};

/// Location of a camera site. Every field is unknown for sites missing from
/// the metadata source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Latitude, decimal degrees north.
    pub lat: Option<f64>,
    /// Longitude, decimal degrees east.
    pub lon: Option<f64>,
    /// Elevation in metres.
    pub elev: Option<f64>,
    /// Offset of local standard time from UTC, in hours.
    pub tzoffset: Option<f64>,
}

impl SiteInfo {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Solar elevation in degrees for a local standard time, if the site's
    /// position is known. A missing UTC offset is taken as zero.
    pub fn sun_elevation<S: SolarElevation + ?Sized>(
        &self,
        solar: &S,
        local_standard: chrono::NaiveDateTime,
    ) -> Option<f64> {
        let (lat, lon) = (self.lat?, self.lon?);
        solar.elevation(lat, lon, local_standard, self.tzoffset.unwrap_or(0.0))
    }
}

/// Source of site metadata keyed by site name.
pub trait SiteInfoSource {
    /// Metadata for `site`. Unknown sites give [`SiteInfo::unknown`].
    fn lookup(&self, site: &str) -> SiteInfo;
}

/// Site metadata from a local TOML file with one table per site:
///
/// ```toml
/// [harvard]
/// lat = 42.5378
/// lon = -72.1715
/// elev = 340.0
/// tzoffset = -5.0
/// ```
#[derive(Clone, Debug, Default)]
pub struct SiteInfoFile {
    pub path: PathBuf,
    sites: HashMap<String, SiteInfo>,
}

impl SiteInfoFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let sites: HashMap<String, SiteInfo> = toml::from_str(&text)?;
        debug!(path = %path.display(), sites = sites.len(), "Loaded site metadata");
        Ok(Self {
            path: path.to_path_buf(),
            sites,
        })
    }

    /// Load the file if present. A missing or unreadable file gives an empty
    /// source, so every lookup returns unknown metadata.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            return Self {
                path: path.to_path_buf(),
                sites: HashMap::new(),
            };
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable site metadata");
            Self {
                path: path.to_path_buf(),
                sites: HashMap::new(),
            }
        })
    }
}

impl SiteInfoSource for SiteInfoFile {
    fn lookup(&self, site: &str) -> SiteInfo {
        self.sites.get(site).copied().unwrap_or_else(|| {
            warn!(site, "No site metadata, location fields will be missing");
            SiteInfo::unknown()
        })
    }
}
