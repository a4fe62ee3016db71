//! Paint sources: solid colors and image patterns

use std::sync::Arc;

use image::imageops::{self, FilterType};
use serde::Deserialize;

use crate::color::Color;

/// Decoded RGBA image (straight alpha)
pub type Image = image::RgbaImage;

/// How a pattern image tiles across the surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    Repeat,
    RepeatX,
    RepeatY,
    #[default]
    NoRepeat,
}

/// An image used as paint, anchored at the surface origin
#[derive(Clone, Debug)]
pub struct Pattern {
    pub image: Image,
    pub repeat: Repeat,
}

impl Pattern {
    pub fn new(image: Image, repeat: Repeat) -> Self {
        Self { image, repeat }
    }
}

/// What bristles, drops and splatter are painted with
#[derive(Clone, Debug)]
pub enum Paint {
    Color(Color),
    Pattern(Arc<Pattern>),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Color(color)
    }
}

impl From<Pattern> for Paint {
    fn from(pattern: Pattern) -> Self {
        Paint::Pattern(Arc::new(pattern))
    }
}

/// Placement of a loaded image on a surface-sized canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFit {
    /// Keep the image as loaded
    #[default]
    None,
    /// Scale to exactly the target size
    Stretch,
    /// Keep the size, center on a transparent canvas of the target size
    Center,
}

/// Fit `image` into a `width`x`height` canvas
pub fn fit_image(image: Image, width: u32, height: u32, fit: ImageFit) -> Image {
    match fit {
        ImageFit::None => image,
        ImageFit::Stretch => imageops::resize(&image, width, height, FilterType::Triangle),
        ImageFit::Center => {
            let mut canvas = Image::new(width, height);
            let left = (i64::from(width) - i64::from(image.width())) / 2;
            let top = (i64::from(height) - i64::from(image.height())) / 2;
            imageops::overlay(&mut canvas, &image, left, top);
            canvas
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> Image {
        Image::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn test_stretch_matches_target_size() {
        let fitted = fit_image(solid(4, 2), 10, 8, ImageFit::Stretch);
        assert_eq!(fitted.dimensions(), (10, 8));
    }

    #[test]
    fn test_center_leaves_transparent_margin() {
        let fitted = fit_image(solid(2, 2), 6, 6, ImageFit::Center);
        assert_eq!(fitted.dimensions(), (6, 6));
        assert_eq!(fitted.get_pixel(0, 0).0[3], 0);
        assert_eq!(fitted.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(fitted.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(fitted.get_pixel(4, 4).0[3], 0);
    }
}
