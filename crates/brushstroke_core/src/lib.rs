//! Brushstroke Core Runtime
//!
//! Animated brush strokes drawn onto any [`Surface`](brushstroke_paint::Surface):
//!
//! - **Curves**: Catmull-Rom style densification of control points
//! - **Ink**: a tip of hairs plus splashed and dripping drops
//! - **Coverage**: edge-to-edge zig-zag plans for filling a region
//! - **Queue**: draw, erase, fill and clear tasks with per-task completion signals
//!
//! # Example
//!
//! ```rust
//! use brushstroke_core::{Animation, Brushstroke, StrokeOverrides};
//! use brushstroke_paint::RecordingSurface;
//!
//! let mut strokes = Brushstroke::new(RecordingSurface::new());
//!
//! // Instant strokes finish before `draw` returns
//! let mut done = strokes
//!     .draw(
//!         StrokeOverrides::new()
//!             .animation(Animation::Points)
//!             .points([0.0, 0.0, 100.0, 40.0]),
//!     )
//!     .unwrap();
//! assert_eq!(done.poll_result(), Some(Ok(())));
//!
//! // Animated strokes advance once per `frame`
//! let _pending = strokes
//!     .erase(StrokeOverrides::new().duration(0.5))
//!     .unwrap();
//! strokes.frame();
//! ```

pub mod brush;
pub mod completion;
pub mod curve;
pub mod driver;
pub mod error;
pub mod ink;
pub mod options;
pub mod positioner;
pub mod queue;
pub mod raster;
pub mod source;

pub use brush::{Brush, BrushSettings, MAX_HAIRS, SPLASHING_BRUSH_SPEED};
pub use completion::CompletionSignal;
pub use curve::{curve, DensePath, DEFAULT_SEGMENTS, DEFAULT_TENSION};
pub use driver::TaskKind;
pub use error::{Result, StrokeError};
pub use ink::{Hair, InkDrop};
pub use options::{Animation, Callback, PathSource, PointSource, StrokeOptions, StrokeOverrides};
pub use positioner::{Coverage, Direction, Pass, StrokePlan};
pub use queue::{Brushstroke, TaskId};
pub use raster::{ImageResponder, PendingImage, RasterRequest, RasterSource, Rasterizer};
pub use source::{random_points, Plan, Route, DEFAULT_RANDOM_POINTS};

pub use brushstroke_animation::{Easing, FrameClock, ManualClock, SystemClock};
