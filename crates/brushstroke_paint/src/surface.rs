//! Destination surfaces - the immediate-mode drawing API brushes paint onto

use crate::paint::{Image, Paint};
use crate::path::Point;
use crate::primitives::{Circle, Rect};

/// Stroke style
#[derive(Clone, Debug)]
pub struct StrokeStyle {
    pub paint: Paint,
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

impl StrokeStyle {
    /// Round caps and joins, the style every ink mark uses
    pub fn round(paint: Paint, width: f32) -> Self {
        Self {
            paint,
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            paint: Paint::default(),
            width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// How new marks combine with existing surface content
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint over existing content
    #[default]
    SourceOver,
    /// Remove existing content where the mark lands
    DestinationOut,
}

/// A 2D immediate-mode drawing target.
///
/// Implementations own their pixels (or command list); brushes only ever
/// issue these primitives.
pub trait Surface {
    /// Stroke a single straight segment
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Fill a batch of circles with one paint
    fn fill_circles(&mut self, circles: &[Circle], paint: &Paint);

    /// Draw an image scaled into `dest`
    fn draw_image(&mut self, image: &Image, dest: Rect);

    /// Reset a region to fully transparent
    fn clear_rect(&mut self, rect: Rect);

    fn composite_mode(&self) -> CompositeMode;

    fn set_composite_mode(&mut self, mode: CompositeMode);
}

/// A paint command recorded by [`RecordingSurface`]
#[derive(Clone, Debug)]
pub enum PaintCommand {
    StrokeSegment {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
    FillCircles {
        circles: Vec<Circle>,
        paint: Paint,
    },
    DrawImage {
        dest: Rect,
        size: (u32, u32),
    },
    ClearRect {
        rect: Rect,
    },
    SetCompositeMode(CompositeMode),
}

/// Surface that records commands instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<PaintCommand>,
    composite: CompositeMode,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded segment strokes as `(from, to, width)`
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point, f32)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            PaintCommand::StrokeSegment { from, to, style } => Some((*from, *to, style.width)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.commands.push(PaintCommand::StrokeSegment {
            from,
            to,
            style: style.clone(),
        });
    }

    fn fill_circles(&mut self, circles: &[Circle], paint: &Paint) {
        self.commands.push(PaintCommand::FillCircles {
            circles: circles.to_vec(),
            paint: paint.clone(),
        });
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) {
        self.commands.push(PaintCommand::DrawImage {
            dest,
            size: image.dimensions(),
        });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(PaintCommand::ClearRect { rect });
    }

    fn composite_mode(&self) -> CompositeMode {
        self.composite
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
        self.commands.push(PaintCommand::SetCompositeMode(mode));
    }
}
