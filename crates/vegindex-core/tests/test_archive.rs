mod common;

use std::fs;

use common::{dt, uniform_image, TestArchive, SITE};
use vegindex_core::io::sidecar::{parse_meta, read_image_meta};
use vegindex_core::timestamp::parse_image_timestamp;

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Image listing
// ---------------------------------------------------------------------------

#[test]
fn test_list_images_filters_and_sorts() {
    let t = TestArchive::new();
    let img = uniform_image(4, 4, [80, 100, 60]);
    t.add_image(dt(2008, 7, 2, 12, 0, 0), false, &img, None);
    t.add_image(dt(2008, 6, 30, 12, 0, 0), false, &img, None);
    t.add_image(dt(2008, 6, 30, 12, 0, 30), true, &img, None);
    t.add_image(dt(2008, 5, 1, 12, 0, 0), false, &img, None);

    let listed = t
        .archive
        .list_images(false, dt(2008, 6, 1, 0, 0, 0), dt(2008, 7, 31, 0, 0, 0))
        .unwrap();
    assert_eq!(
        names(&listed),
        vec![
            "testsite_2008_06_30_120000.jpg",
            "testsite_2008_07_02_120000.jpg"
        ]
    );

    let ir = t
        .archive
        .list_images(true, dt(2008, 1, 1, 0, 0, 0), dt(2008, 12, 31, 0, 0, 0))
        .unwrap();
    assert_eq!(names(&ir), vec!["testsite_IR_2008_06_30_120030.jpg"]);
}

#[test]
fn test_list_images_bounds_are_inclusive() {
    let t = TestArchive::new();
    let img = uniform_image(4, 4, [80, 100, 60]);
    t.add_image(dt(2008, 6, 1, 12, 0, 0), false, &img, None);

    let at = dt(2008, 6, 1, 12, 0, 0);
    assert_eq!(t.archive.list_images(false, at, at).unwrap().len(), 1);
}

#[test]
fn test_list_images_ignores_other_files() {
    let t = TestArchive::new();
    let img = uniform_image(4, 4, [80, 100, 60]);
    let path = t.add_image(dt(2008, 6, 1, 12, 0, 0), false, &img, Some(100));
    let month_dir = path.parent().unwrap();
    fs::write(month_dir.join("testsite_2008_06_01_130000.png"), b"x").unwrap();
    fs::write(month_dir.join("othersite_2008_06_01_120000.jpg"), b"x").unwrap();
    fs::create_dir_all(t.archive.site_dir().join("2008").join("thumbs")).unwrap();

    let listed = t
        .archive
        .list_images(false, dt(2008, 1, 1, 0, 0, 0), dt(2009, 1, 1, 0, 0, 0))
        .unwrap();
    assert_eq!(listed, vec![path]);
}

#[test]
fn test_missing_site_dir_lists_nothing() {
    let t = TestArchive::new();
    fs::remove_dir_all(t.archive.site_dir()).unwrap();
    let listed = t
        .archive
        .list_images(false, dt(2008, 1, 1, 0, 0, 0), dt(2009, 1, 1, 0, 0, 0))
        .unwrap();
    assert!(listed.is_empty());
}

// ---------------------------------------------------------------------------
// Filenames and sidecars
// ---------------------------------------------------------------------------

#[test]
fn test_parse_image_timestamps() {
    assert_eq!(
        parse_image_timestamp(SITE, "testsite_2008_06_01_123045.jpg", false).unwrap(),
        dt(2008, 6, 1, 12, 30, 45)
    );
    assert_eq!(
        parse_image_timestamp(SITE, "testsite_IR_2008_06_01_123045.jpg", true).unwrap(),
        dt(2008, 6, 1, 12, 30, 45)
    );
    assert!(parse_image_timestamp(SITE, "testsite_2008_13_01_123045.jpg", false).is_err());
    assert!(parse_image_timestamp(SITE, "other_2008_06_01_123045.jpg", false).is_err());
}

#[test]
fn test_sidecar_metadata() {
    let meta = parse_meta("exposure=120\nbalance=0\nfoo=bar\n");
    assert_eq!(meta.exposure, Some(120));
    assert_eq!(meta.awbflag, Some(0));

    let t = TestArchive::new();
    let img = uniform_image(4, 4, [80, 100, 60]);
    let with_meta = t.add_image(dt(2008, 6, 1, 12, 0, 0), false, &img, Some(42));
    let without = t.add_image(dt(2008, 6, 1, 13, 0, 0), false, &img, None);
    assert_eq!(read_image_meta(&with_meta).exposure, Some(42));
    assert_eq!(read_image_meta(&without).exposure, None);
}
