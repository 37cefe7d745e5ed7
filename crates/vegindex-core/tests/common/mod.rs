#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

use vegindex_core::io::image_io::save_mask_png;
use vegindex_core::io::Archive;
use vegindex_core::roi::{Mask, RoiInterval, RoiList, RoiName};
use vegindex_core::series::RoiStatsRow;
use vegindex_core::stats::{ChannelStats, RgbStats};

pub const SITE: &str = "testsite";

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
pub struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with a plain-text subscriber and return its result and log output.
pub fn with_captured_log<T>(f: impl FnOnce() -> T) -> (T, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, log.text())
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    ymd(y, m, d).and_hms_opt(h, mi, s).unwrap()
}

/// Image filled with a single color.
pub fn uniform_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Image whose pixel values come from `f(x, y)`.
pub fn image_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y)))
}

fn channel(mean: f64) -> ChannelStats {
    ChannelStats {
        mean: Some(mean),
        stdev: Some(0.0),
        percentiles: [Some(mean); 7],
    }
}

/// RGB row with the given channel means, or missing statistics for `None`.
pub fn rgb_row(taken: NaiveDateTime, means: Option<[f64; 3]>, solar_elev: Option<f64>) -> RoiStatsRow {
    let stats = match means {
        Some([r, g, b]) => RgbStats {
            red: channel(r),
            green: channel(g),
            blue: channel(b),
            rg_correlation: None,
            gb_correlation: None,
            br_correlation: None,
        },
        None => RgbStats::no_data(),
    };
    let mut row = RoiStatsRow {
        datetime: taken,
        filename: format!("{SITE}_{}.jpg", taken.format("%Y_%m_%d_%H%M%S")),
        solar_elev,
        exposure: Some(100),
        awbflag: Some(1),
        mask_index: Some(1),
        gcc: None,
        rcc: None,
        stats,
    };
    row.derive_indices();
    row
}

pub fn roi_name() -> RoiName {
    RoiName::new("DB", 1).unwrap()
}

/// A throwaway archive rooted in a temporary directory.
pub struct TestArchive {
    pub dir: TempDir,
    pub archive: Archive,
}

impl TestArchive {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let archive = Archive::new(dir.path(), SITE);
        fs::create_dir_all(archive.roi_dir()).unwrap();
        Self { dir, archive }
    }

    /// Write `<site>[_IR]_YYYY_MM_DD_HHMMSS.jpg` and, when `exposure` is
    /// given, its `.meta` sidecar.
    pub fn add_image(
        &self,
        taken: NaiveDateTime,
        infrared: bool,
        image: &RgbImage,
        exposure: Option<i64>,
    ) -> PathBuf {
        let month_dir = self
            .archive
            .site_dir()
            .join(taken.format("%Y").to_string())
            .join(taken.format("%m").to_string());
        fs::create_dir_all(&month_dir).unwrap();

        let prefix = if infrared {
            format!("{SITE}_IR")
        } else {
            SITE.to_string()
        };
        let name = format!("{prefix}_{}.jpg", taken.format("%Y_%m_%d_%H%M%S"));
        let path = month_dir.join(name);
        image.save(&path).unwrap();

        if let Some(exposure) = exposure {
            fs::write(
                path.with_extension("meta"),
                format!("exposure={exposure}\nbalance=1\n"),
            )
            .unwrap();
        }
        path
    }

    /// Site metadata for a mid-latitude site in UTC-5.
    pub fn write_sites(&self) {
        let text = format!("[{SITE}]\nlat = 42.5378\nlon = -72.1715\nelev = 340.0\ntzoffset = -5.0\n");
        fs::write(self.archive.site_info_path(), text).unwrap();
    }

    /// Save `mask` and an ROI list with one interval per entry of `spans`.
    pub fn write_roi_list(&self, mask: &Mask, spans: &[(NaiveDateTime, NaiveDateTime)]) {
        let roi = roi_name();
        let mut list = RoiList::new(SITE, &roi);
        for (i, &(start, end)) in spans.iter().enumerate() {
            let maskfile = format!("{SITE}_{roi}_{:02}.png", i + 1);
            save_mask_png(mask, &self.archive.mask_path(&maskfile)).unwrap();
            list.masks.push(RoiInterval {
                start,
                end,
                maskfile,
                sample_image: format!("{SITE}_sample.jpg"),
            });
        }
        list.write(&self.archive.roi_list_path(&roi)).unwrap();
    }
}
