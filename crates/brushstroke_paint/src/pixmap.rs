//! Software rasterizing surface backed by a `tiny-skia` pixmap

use std::sync::Arc;

use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Pixmap, PixmapPaint, SpreadMode, Transform,
};

use crate::error::{PaintError, Result};
use crate::paint::{Image, Paint, Pattern, Repeat};
use crate::path::Point;
use crate::primitives::{Circle, Rect};
use crate::surface::{CompositeMode, LineCap, LineJoin, StrokeStyle, Surface};

/// An RGBA raster surface
pub struct PixmapSurface {
    pixmap: Pixmap,
    composite: CompositeMode,
    /// Uploaded pattern images, keyed by the pattern they came from
    patterns: Vec<(Arc<Pattern>, Pixmap)>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(PaintError::InvalidSurfaceSize { width, height })?;
        Ok(Self {
            pixmap,
            composite: CompositeMode::default(),
            patterns: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA value of a pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Number of pixels with any coverage
    pub fn painted_pixels(&self) -> usize {
        self.pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    pub fn is_transparent(&self) -> bool {
        self.painted_pixels() == 0
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| PaintError::Encode(e.to_string()))
    }

    fn blend_mode(&self) -> BlendMode {
        match self.composite {
            CompositeMode::SourceOver => BlendMode::SourceOver,
            CompositeMode::DestinationOut => BlendMode::DestinationOut,
        }
    }

    /// Run `draw` with a tiny-skia paint equivalent to `paint`
    fn with_paint(&mut self, paint: &Paint, draw: impl FnOnce(&mut Pixmap, &tiny_skia::Paint<'_>)) {
        let mut sk = tiny_skia::Paint {
            anti_alias: true,
            blend_mode: self.blend_mode(),
            ..Default::default()
        };

        match paint {
            Paint::Color(color) => {
                let [r, g, b, a] = color.to_rgba8();
                sk.set_color_rgba8(r, g, b, a);
                draw(&mut self.pixmap, &sk);
            }
            Paint::Pattern(pattern) => {
                let idx = match self
                    .patterns
                    .iter()
                    .position(|(key, _)| Arc::ptr_eq(key, pattern))
                {
                    Some(idx) => idx,
                    None => {
                        let Some(uploaded) = image_to_pixmap(&pattern.image) else {
                            tracing::warn!("Skipping empty pattern image");
                            return;
                        };
                        // Drop uploads whose pattern nothing else holds anymore
                        self.patterns.retain(|(key, _)| Arc::strong_count(key) > 1);
                        self.patterns.push((pattern.clone(), uploaded));
                        self.patterns.len() - 1
                    }
                };
                // tiny-skia has no decal spread; pad is the closest to no-repeat
                let spread = match pattern.repeat {
                    Repeat::NoRepeat => SpreadMode::Pad,
                    Repeat::Repeat | Repeat::RepeatX | Repeat::RepeatY => SpreadMode::Repeat,
                };
                sk.shader = tiny_skia::Pattern::new(
                    self.patterns[idx].1.as_ref(),
                    spread,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::identity(),
                );
                draw(&mut self.pixmap, &sk);
            }
        }
    }
}

fn image_to_pixmap(image: &Image) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

impl Surface for PixmapSurface {
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        if style.width <= 0.0 {
            // tiny-skia treats zero width as a hairline
            return;
        }
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = tiny_skia::Stroke {
            width: style.width,
            line_cap: match style.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Default::default()
        };

        self.with_paint(&style.paint, |pixmap, paint| {
            pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
        });
    }

    fn fill_circles(&mut self, circles: &[Circle], paint: &Paint) {
        let mut pb = tiny_skia::PathBuilder::new();
        for circle in circles.iter().filter(|c| c.radius > 0.0) {
            pb.push_circle(circle.center.x, circle.center.y, circle.radius);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        self.with_paint(paint, |pixmap, paint| {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        });
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) {
        let Some(src) = image_to_pixmap(image) else {
            return;
        };
        let sx = dest.width / src.width() as f32;
        let sy = dest.height / src.height() as f32;
        let paint = PixmapPaint {
            blend_mode: self.blend_mode(),
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, dest.x, dest.y),
            None,
        );
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return;
        };
        let paint = tiny_skia::Paint {
            anti_alias: false,
            blend_mode: BlendMode::Clear,
            ..Default::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn composite_mode(&self) -> CompositeMode {
        self.composite
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }
}
