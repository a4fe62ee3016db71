//! Path building, SVG path data and arc-length measurement

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::PathEvent;
use smallvec::SmallVec;
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::error::{PaintError, Result};

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation toward `other`
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        control: Point,
        end: Point,
    },
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Close,
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse SVG path data (the `d` attribute of a `<path>` element).
    ///
    /// Relative commands, shorthand curves and arcs are normalized into
    /// absolute lines, quadratics and cubics.
    pub fn from_svg_data(data: &str) -> Result<Self> {
        let mut builder = PathBuilder::new();
        for segment in SimplifyingPathParser::from(data) {
            let segment = segment.map_err(|e| PaintError::InvalidPathData(e.to_string()))?;
            builder = match segment {
                SimplePathSegment::MoveTo { x, y } => builder.move_to(x as f32, y as f32),
                SimplePathSegment::LineTo { x, y } => builder.line_to(x as f32, y as f32),
                SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    builder.quad_to(x1 as f32, y1 as f32, x as f32, y as f32)
                }
                SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => builder.cubic_to(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                ),
                SimplePathSegment::ClosePath => builder.close(),
            };
        }

        let path = builder.build();
        if path.is_empty() {
            return Err(PaintError::EmptyPath);
        }
        Ok(path)
    }

    /// Convert to a lyon path, inserting the implicit begin/end events
    /// SVG semantics allow but lyon requires.
    pub fn to_lyon(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        let mut open = false;
        let mut first = Point::ZERO;
        let mut current = Point::ZERO;

        macro_rules! ensure_open {
            () => {
                if !open {
                    builder.begin(point(current.x, current.y));
                    first = current;
                    open = true;
                }
            };
        }

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if open {
                        builder.end(false);
                        open = false;
                    }
                    current = p;
                    ensure_open!();
                }
                PathCommand::LineTo(p) => {
                    ensure_open!();
                    builder.line_to(point(p.x, p.y));
                    current = p;
                }
                PathCommand::QuadTo { control, end } => {
                    ensure_open!();
                    builder.quadratic_bezier_to(point(control.x, control.y), point(end.x, end.y));
                    current = end;
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    ensure_open!();
                    builder.cubic_bezier_to(
                        point(control1.x, control1.y),
                        point(control2.x, control2.y),
                        point(end.x, end.y),
                    );
                    current = end;
                }
                PathCommand::Close => {
                    if open {
                        builder.end(true);
                        open = false;
                        current = first;
                    }
                }
            }
        }

        if open {
            builder.end(false);
        }
        builder.build()
    }
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            path: Path::new(),
            current: Point::ZERO,
        }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::MoveTo(point));
        self.current = point;
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::LineTo(point));
        self.current = point;
        self
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        let end = Point::new(x, y);
        self.path.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end,
        });
        self.current = end;
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        let end = Point::new(x, y);
        self.path.commands.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end,
        });
        self.current = end;
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    /// Get the current cursor position
    pub fn current_position(&self) -> Point {
        self.current
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flattening tolerance used when measuring paths
pub const DEFAULT_TOLERANCE: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
struct MeasuredSegment {
    from: Point,
    to: Point,
    /// Arc length at `from`
    offset: f32,
    length: f32,
}

/// Arc-length parameterization of a flattened [`Path`].
///
/// Moves between subpaths contribute no length.
#[derive(Clone, Debug)]
pub struct PathMeasure {
    segments: Vec<MeasuredSegment>,
    start: Point,
    length: f32,
}

impl PathMeasure {
    pub fn new(path: &Path, tolerance: f32) -> Result<Self> {
        let mut segments = Vec::new();
        let mut start = None;
        let mut length = 0.0;

        let mut push = |from: lyon::math::Point, to: lyon::math::Point, length: &mut f32| {
            let from = Point::new(from.x, from.y);
            let to = Point::new(to.x, to.y);
            let seg_len = from.distance(to);
            segments.push(MeasuredSegment {
                from,
                to,
                offset: *length,
                length: seg_len,
            });
            *length += seg_len;
        };

        for event in path.to_lyon().iter().flattened(tolerance) {
            match event {
                PathEvent::Begin { at } => {
                    start.get_or_insert(Point::new(at.x, at.y));
                }
                PathEvent::Line { from, to } => push(from, to, &mut length),
                PathEvent::End { last, first, close } => {
                    if close && last != first {
                        push(last, first, &mut length);
                    }
                }
                // Flattening only yields line segments
                PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
            }
        }

        let start = start.ok_or(PaintError::EmptyPath)?;
        Ok(Self {
            segments,
            start,
            length,
        })
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Point at `distance` along the path, clamped to the path's extent
    pub fn point_at_length(&self, distance: f32) -> Point {
        let Some(last) = self.segments.last() else {
            return self.start;
        };
        if distance <= 0.0 {
            return self.segments[0].from;
        }
        if distance >= self.length {
            return last.to;
        }

        let idx = self
            .segments
            .partition_point(|seg| seg.offset + seg.length < distance)
            .min(self.segments.len() - 1);
        let seg = &self.segments[idx];
        if seg.length <= f32::EPSILON {
            return seg.to;
        }
        seg.from.lerp(seg.to, (distance - seg.offset) / seg.length)
    }
}
