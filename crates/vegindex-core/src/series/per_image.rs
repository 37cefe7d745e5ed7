use std::path::Path;

use chrono::NaiveDateTime;
use image::RgbImage;
use tracing::{debug, warn};

use crate::error::{Result, VegIndexError};
use crate::io::image_io::{load_rgb_image, matches_mask, resize_to_mask};
use crate::io::sidecar::{read_image_meta, ImageMeta};
use crate::io::{write_table, Record, Table};
use crate::roi::Mask;
use crate::series::info::SeriesInfo;
use crate::series::keyed::{Keyed, KeyedRows};
use crate::site::SolarElevation;
use crate::summary::selection::SelectionCriteria;
use crate::timestamp::parse_image_timestamp;

/// A row type stored in a per-image series file.
pub trait SeriesRow: Keyed + Sized {
    /// File title, completed with ` for <site>`.
    const TITLE: &'static str;

    fn columns() -> Vec<String>;

    fn datetime(&self) -> NaiveDateTime;

    /// Brightness compared against the selection window.
    fn brightness(&self) -> Option<f64>;

    fn solar_elev(&self) -> Option<f64>;

    fn to_line(&self) -> String;

    fn from_record(table: &Table, record: &Record) -> Result<Self>;
}

/// A decoded image with everything known about it before measurement.
pub struct PreparedImage {
    pub filename: String,
    pub datetime: NaiveDateTime,
    pub solar_elev: Option<f64>,
    pub meta: ImageMeta,
    pub pixels: RgbImage,
}

/// A row type measured directly from archive images.
pub trait ImageRow: SeriesRow {
    /// Whether the source images carry the `_IR` filename prefix.
    const INFRARED: bool;

    fn measure(image: PreparedImage, mask: &Mask, mask_index: usize) -> Result<Self>;
}

/// Per-image rows for one site ROI, keyed by row key and written sorted by
/// timestamp.
#[derive(Clone, Debug)]
pub struct PerImageSeries<R: SeriesRow> {
    pub info: SeriesInfo,
    pub rows: KeyedRows<R>,
}

impl<R: SeriesRow> PerImageSeries<R> {
    pub fn new(info: SeriesInfo) -> Self {
        Self {
            info,
            rows: KeyedRows::new(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let table = Table::read(path)?;
        let info = SeriesInfo::from_table(&table)?;
        let rows = table
            .records
            .iter()
            .map(|record| R::from_record(&table, record))
            .collect::<Result<KeyedRows<R>>>()?;
        debug!(path = %path.display(), rows = rows.len(), "Read per-image series");
        Ok(Self { info, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort(&mut self) {
        self.rows.sort_by_key(|r| r.datetime());
    }

    pub fn last_datetime(&self) -> Option<NaiveDateTime> {
        self.rows.iter().map(|r| r.datetime()).max()
    }

    pub fn title(&self) -> String {
        format!("{} for {}", R::TITLE, self.info.site)
    }

    /// Sort, stamp the update time and write. Returns the number of rows.
    pub fn write(&mut self, path: &Path) -> Result<usize> {
        self.sort();
        self.info.touch();
        let header = self.info.per_image_header();
        write_table(
            path,
            &self.title(),
            &header,
            &R::columns(),
            self.rows.iter().map(R::to_line),
        )
    }

    /// Rows passing `criteria`, in timestamp order.
    pub fn select_rows(&self, criteria: &SelectionCriteria) -> Vec<&R> {
        let mut selected: Vec<&R> = self.rows.iter().filter(|r| criteria.accepts(*r)).collect();
        selected.sort_by_key(|r| r.datetime());
        selected
    }
}

impl<R: ImageRow> PerImageSeries<R> {
    /// Measure one image against one mask.
    ///
    /// Images that cannot be decoded or leave no pixels after masking are
    /// skipped with a warning. A mask whose size differs from the image is an
    /// error unless the series resizes images.
    pub fn create_row<S: SolarElevation + ?Sized>(
        &self,
        path: &Path,
        mask: &Mask,
        mask_index: usize,
        solar: &S,
    ) -> Result<Option<R>> {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "Skipping image with non UTF-8 name");
            return Ok(None);
        };
        let datetime = match parse_image_timestamp(&self.info.site, filename, R::INFRARED) {
            Ok(dt) => dt,
            Err(e) => {
                warn!(error = %e, "Skipping image");
                return Ok(None);
            }
        };
        let solar_elev = self.info.location.sun_elevation(solar, datetime);

        let mut pixels = match load_rgb_image(path) {
            Ok(img) => img,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to open image, skipping");
                return Ok(None);
            }
        };
        if self.info.resize && !matches_mask(&pixels, mask) {
            warn!(filename, "Resizing image to match mask");
            pixels = resize_to_mask(&pixels, mask);
        }

        let image = PreparedImage {
            filename: filename.to_string(),
            datetime,
            solar_elev,
            meta: read_image_meta(path),
            pixels,
        };

        match R::measure(image, mask, mask_index) {
            Ok(row) => Ok(Some(row)),
            Err(VegIndexError::EmptyRegion) => {
                warn!(filename, "No unmasked pixels, skipping");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Measure an image and replace or add its row. Returns `true` when a row
    /// was produced.
    pub fn insert_image<S: SolarElevation + ?Sized>(
        &mut self,
        path: &Path,
        mask: &Mask,
        mask_index: usize,
        solar: &S,
    ) -> Result<bool> {
        match self.create_row(path, mask, mask_index, solar)? {
            Some(row) => {
                self.rows.insert(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Measure an image and append its row without checking for an existing
    /// one. The caller guarantees the image is new to the series.
    pub fn append_image<S: SolarElevation + ?Sized>(
        &mut self,
        path: &Path,
        mask: &Mask,
        mask_index: usize,
        solar: &S,
    ) -> Result<bool> {
        match self.create_row(path, mask, mask_index, solar)? {
            Some(row) => {
                self.rows.append(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
