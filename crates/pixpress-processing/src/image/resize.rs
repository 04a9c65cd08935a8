use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Aspect-preserving downscale into a bounding box
pub struct ImageResize;

impl ImageResize {
    /// Largest size that fits inside `max_width × max_height` with the same aspect ratio.
    ///
    /// Images already inside the box keep their size. Otherwise the limiting side lands
    /// exactly on its bound.
    pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
        if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
            return (width, height);
        }
        if width <= max_width && height <= max_height {
            return (width, height);
        }

        let (w, h) = (width as u64, height as u64);
        let (mw, mh) = (max_width as u64, max_height as u64);

        // Compare w/mw against h/mh without floats
        if w * mh >= h * mw {
            let new_height = ((h * mw + w / 2) / w).clamp(1, mh);
            (max_width, new_height as u32)
        } else {
            let new_width = ((w * mh + h / 2) / h).clamp(1, mw);
            (new_width as u32, max_height)
        }
    }

    /// Downscale with Lanczos3. Never upscales.
    pub fn downscale(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_within(orig_width, orig_height, max_width, max_height);

        if (width, height) == (orig_width, orig_height) {
            return img.clone();
        }

        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = width,
            to_height = height,
            "Downscaling image"
        );

        img.resize_exact(width, height, FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(ImageResize::fit_within(4000, 3000, 800, 800), (800, 600));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(ImageResize::fit_within(3000, 4000, 800, 800), (600, 800));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(ImageResize::fit_within(200, 100, 800, 600), (200, 100));
    }

    #[test]
    fn test_fit_within_one_side_over() {
        assert_eq!(ImageResize::fit_within(1000, 100, 500, 500), (500, 50));
        assert_eq!(ImageResize::fit_within(100, 1000, 500, 500), (50, 500));
    }

    #[test]
    fn test_fit_within_extreme_ratio_keeps_one_pixel() {
        assert_eq!(ImageResize::fit_within(10000, 1, 100, 100), (100, 1));
    }

    #[test]
    fn test_fit_within_bounds_hold() {
        for &(w, h) in &[(1920, 1080), (1080, 1920), (333, 777), (5000, 4999), (7, 3000)] {
            for &(mw, mh) in &[(100, 100), (640, 480), (1, 50), (300, 2000)] {
                let (nw, nh) = ImageResize::fit_within(w, h, mw, mh);
                assert!(nw <= mw && nh <= mh, "{}x{} in {}x{} -> {}x{}", w, h, mw, mh, nw, nh);
                assert!(nw == mw || nh == mh || (nw == w && nh == h));
            }
        }
    }

    #[test]
    fn test_downscale_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 200, Rgb([10, 20, 30])));
        let out = ImageResize::downscale(&img, 100, 100);
        assert_eq!(out.dimensions(), (100, 50));

        let small = ImageResize::downscale(&img, 1000, 1000);
        assert_eq!(small.dimensions(), (400, 200));
    }
}
