//! Brushstroke Paint API
//!
//! The 2D drawing vocabulary shared by brushes and their hosts.
//!
//! # Features
//!
//! - Points, rectangles and circles
//! - Colors with CSS-style parsing (`#ccc`, `rgba(...)`, named colors)
//! - Vector paths, SVG path data and arc-length measurement
//! - Solid and image-pattern paints
//! - The [`Surface`] trait plus recording and raster implementations

pub mod color;
pub mod error;
pub mod paint;
pub mod path;
pub mod pixmap;
pub mod primitives;
pub mod surface;

pub use color::Color;
pub use error::{PaintError, Result};
pub use paint::{fit_image, Image, ImageFit, Paint, Pattern, Repeat};
pub use path::{Path, PathBuilder, PathCommand, PathMeasure, Point, DEFAULT_TOLERANCE};
pub use pixmap::PixmapSurface;
pub use primitives::*;
pub use surface::{
    CompositeMode, LineCap, LineJoin, PaintCommand, RecordingSurface, StrokeStyle, Surface,
};
