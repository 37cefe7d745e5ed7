use std::path::Path;

use ndarray::Array2;

use crate::error::Result;
use crate::io::image_io::load_mask_image;

/// Boolean ROI mask. `true` marks a pixel excluded from statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    /// Shape is `(height, width)`.
    pub excluded: Array2<bool>,
}

impl Mask {
    pub fn new(excluded: Array2<bool>) -> Self {
        Self { excluded }
    }

    /// Mask with every pixel included.
    pub fn open(width: usize, height: usize) -> Self {
        Self::new(Array2::from_elem((height, width), false))
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_mask_image(path)
    }

    pub fn width(&self) -> usize {
        self.excluded.ncols()
    }

    pub fn height(&self) -> usize {
        self.excluded.nrows()
    }

    /// Number of pixels that contribute to statistics.
    pub fn included_count(&self) -> usize {
        self.excluded.iter().filter(|&&m| !m).count()
    }
}
