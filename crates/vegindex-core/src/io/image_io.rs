use std::path::Path;

use image::imageops::FilterType;
use image::{GrayImage, ImageFormat, Luma, RgbImage};
use ndarray::Array2;

use crate::error::Result;
use crate::roi::mask::Mask;

/// Load an image file as 8-bit RGB. Greyscale images are expanded to three
/// identical bands.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}

/// Resize an image to the mask's pixel dimensions with a Lanczos filter.
pub fn resize_to_mask(image: &RgbImage, mask: &Mask) -> RgbImage {
    image::imageops::resize(
        image,
        mask.width() as u32,
        mask.height() as u32,
        FilterType::Lanczos3,
    )
}

/// Whether `image` already has the mask's pixel dimensions.
pub fn matches_mask(image: &RgbImage, mask: &Mask) -> bool {
    let (w, h) = image.dimensions();
    w as usize == mask.width() && h as usize == mask.height()
}

/// Load a mask image. Any nonzero luminance marks an excluded pixel.
pub fn load_mask_image(path: &Path) -> Result<Mask> {
    let gray = image::open(path)?.to_luma8();
    let (w, h) = gray.dimensions();
    let mut excluded = Array2::<bool>::from_elem((h as usize, w as usize), false);

    for (col, row, pixel) in gray.enumerate_pixels() {
        excluded[[row as usize, col as usize]] = pixel.0[0] != 0;
    }

    Ok(Mask::new(excluded))
}

/// Save a mask as an 8-bit PNG, excluded pixels white.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<()> {
    let mut img = GrayImage::new(mask.width() as u32, mask.height() as u32);
    for ((row, col), &masked) in mask.excluded.indexed_iter() {
        let val = if masked { 255 } else { 0 };
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
