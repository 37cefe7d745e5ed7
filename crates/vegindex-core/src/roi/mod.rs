pub mod list;
pub mod mask;

use std::fmt;
use std::str::FromStr;

use crate::consts::ROI_TYPES;
use crate::error::{Result, VegIndexError};

pub use list::{RoiInterval, RoiList};
pub use mask::Mask;

/// Check a vegetation type code against the recognized set.
pub fn validate_veg_type(roitype: &str) -> Result<()> {
    if ROI_TYPES.contains(&roitype) {
        Ok(())
    } else {
        Err(VegIndexError::UnknownVegType(roitype.to_string()))
    }
}

/// ROI identifier within a site, written `DB_0001`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoiName {
    pub roitype: String,
    pub sequence: u32,
}

impl RoiName {
    pub fn new(roitype: &str, sequence: u32) -> Result<Self> {
        validate_veg_type(roitype)?;
        Ok(Self {
            roitype: roitype.to_string(),
            sequence,
        })
    }
}

impl fmt::Display for RoiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:04}", self.roitype, self.sequence)
    }
}

impl FromStr for RoiName {
    type Err = VegIndexError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || VegIndexError::InvalidRoiName(s.to_string());
        let (roitype, seq) = s.rsplit_once('_').ok_or_else(invalid)?;
        if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = seq.parse().map_err(|_| invalid())?;
        Self::new(roitype, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_name_roundtrip() {
        let name: RoiName = "DB_0001".parse().unwrap();
        assert_eq!(name.roitype, "DB");
        assert_eq!(name.sequence, 1);
        assert_eq!(name.to_string(), "DB_0001");
    }

    #[test]
    fn roi_name_rejects_unknown_type() {
        assert!(matches!(
            "QQ_0001".parse::<RoiName>(),
            Err(VegIndexError::UnknownVegType(_))
        ));
        assert!("DB0001".parse::<RoiName>().is_err());
        assert!("DB_00x1".parse::<RoiName>().is_err());
    }
}
