//! Stroke options
//!
//! [`StrokeOptions`] is the fully resolved configuration a task runs with. Callers
//! pass [`StrokeOverrides`] with any subset of fields; unset fields take the
//! instance defaults. Both load from TOML with snake_case keys and kebab-case enum
//! values:
//!
//! ```toml
//! animation = "points"
//! points = [20, 20, 140, 90, 280, 30]
//! color = "#e0245e"
//! frames = 60
//! frame_animation = true
//! easing = "ease-in-out-quad"
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use brushstroke_animation::{Easing, Timing};
use brushstroke_paint::{Color, Path, Repeat};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Result, StrokeError};
use crate::positioner::Direction;

/// What the brush follows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    ToTop,
    #[default]
    ToBottom,
    ToLeft,
    ToRight,
    /// A vector path
    Path,
    /// Control points densified with a spline
    Points,
}

impl Animation {
    /// Coverage direction for the edge-to-edge animations
    pub fn direction(self) -> Option<Direction> {
        match self {
            Animation::ToTop => Some(Direction::ToTop),
            Animation::ToBottom => Some(Direction::ToBottom),
            Animation::ToLeft => Some(Direction::ToLeft),
            Animation::ToRight => Some(Direction::ToRight),
            Animation::Path | Animation::Points => None,
        }
    }
}

impl FromStr for Animation {
    type Err = StrokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "to-top" => Ok(Animation::ToTop),
            "to-bottom" => Ok(Animation::ToBottom),
            "to-left" => Ok(Animation::ToLeft),
            "to-right" => Ok(Animation::ToRight),
            "path" => Ok(Animation::Path),
            "points" => Ok(Animation::Points),
            other => Err(StrokeError::Unsupported(format!(
                "unknown animation `{other}`"
            ))),
        }
    }
}

/// Control points for the `points` animation
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointSource {
    /// Flattened `[x0, y0, x1, y1, ...]`
    Explicit(Vec<f32>),
    /// Number of random points inside the region (0 means 10)
    Random(u32),
}

impl From<Vec<f32>> for PointSource {
    fn from(points: Vec<f32>) -> Self {
        PointSource::Explicit(points)
    }
}

impl From<&[f32]> for PointSource {
    fn from(points: &[f32]) -> Self {
        PointSource::Explicit(points.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for PointSource {
    fn from(points: [f32; N]) -> Self {
        PointSource::Explicit(points.to_vec())
    }
}

impl From<u32> for PointSource {
    fn from(count: u32) -> Self {
        PointSource::Random(count)
    }
}

/// Path for the `path` animation
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum PathSource {
    /// SVG path data (`d` attribute syntax)
    Data(String),
    Path(Path),
}

impl From<String> for PathSource {
    fn from(data: String) -> Self {
        PathSource::Data(data)
    }
}

impl From<&str> for PathSource {
    fn from(data: &str) -> Self {
        PathSource::Data(data.to_string())
    }
}

impl From<Path> for PathSource {
    fn from(path: Path) -> Self {
        PathSource::Path(path)
    }
}

/// Stroke lifecycle hook
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

macro_rules! stroke_options {
    (
        values {
            $( $(#[$vmeta:meta])* $vname:ident: $vty:ty = $vdefault:expr, )*
        }
        optional {
            $( $(#[$ometa:meta])* $oname:ident: $oty:ty, )*
        }
    ) => {
        /// Fully resolved stroke configuration
        #[derive(Clone, Debug, Deserialize)]
        #[serde(default)]
        pub struct StrokeOptions {
            $( $(#[$vmeta])* pub $vname: $vty, )*
            $( $(#[$ometa])* pub $oname: Option<$oty>, )*
            /// Runs when the stroke starts drawing
            #[serde(skip)]
            pub begin: Option<Callback>,
            /// Runs when the stroke finishes, before its completion signal resolves
            #[serde(skip)]
            pub end: Option<Callback>,
        }

        impl Default for StrokeOptions {
            fn default() -> Self {
                Self {
                    $( $vname: $vdefault, )*
                    $( $oname: None, )*
                    begin: None,
                    end: None,
                }
            }
        }

        /// Per-call options; unset fields fall back to the instance defaults
        #[derive(Clone, Debug, Default, Deserialize)]
        #[serde(default)]
        pub struct StrokeOverrides {
            $( pub $vname: Option<$vty>, )*
            $( pub $oname: Option<$oty>, )*
            #[serde(skip)]
            pub begin: Option<Callback>,
            #[serde(skip)]
            pub end: Option<Callback>,
        }

        impl StrokeOverrides {
            $(
                pub fn $vname(mut self, value: $vty) -> Self {
                    self.$vname = Some(value);
                    self
                }
            )*
            $(
                pub fn $oname(mut self, value: impl Into<$oty>) -> Self {
                    self.$oname = Some(value.into());
                    self
                }
            )*
        }

        impl StrokeOptions {
            /// Apply `overrides` on top of these options
            pub fn merged(&self, overrides: StrokeOverrides) -> StrokeOptions {
                StrokeOptions {
                    $( $vname: overrides.$vname.unwrap_or_else(|| self.$vname.clone()), )*
                    $( $oname: overrides.$oname.or_else(|| self.$oname.clone()), )*
                    begin: overrides.begin.or_else(|| self.begin.clone()),
                    end: overrides.end.or_else(|| self.end.clone()),
                }
            }
        }
    };
}

stroke_options! {
    values {
        animation: Animation = Animation::ToBottom,
        /// Step once per host frame instead of running all frames at once
        frame_animation: bool = false,
        frames: f32 = 0.0,
        /// Seconds
        duration: f32 = 0.0,
        /// Seconds before the first step
        delay: f32 = 0.0,
        color: Color = Color::from_hex(0xcccccc),
        /// Region width used for coverage, random points and clearing
        width: u32 = 300,
        height: u32 = 120,
        /// Brush tip diameter
        size: f32 = 40.0,
        ink_amount: f32 = 1.0,
        /// Cover with separate lifted passes instead of one continuous stroke
        lifting: bool = false,
        dripping: bool = false,
        splashing: bool = true,
        padding: f32 = 30.0,
        overlap: f32 = 10.0,
        tension: f32 = 0.5,
        reduce_overflow: f32 = 20.0,
        /// Tiling of image and markup patterns
        repeat: Repeat = Repeat::NoRepeat,
        /// Resize a loaded image to the region
        stretch: bool = false,
        /// Center a loaded image in the region
        centered: bool = false,
        /// Wait for earlier queued tasks
        queue: bool = false,
        /// Brush tilt in radians for `path` and `points`
        angle: f32 = 0.0,
        easing: Easing = Easing::Linear,
    }
    optional {
        path: PathSource,
        points: PointSource,
        /// Image URL or path handed to the rasterizer
        image: String,
        /// Markup handed to the rasterizer
        markup: String,
    }
}

/// Decode options from TOML; an unknown `animation` name is reported as
/// [`StrokeError::Unsupported`], the same as parsing it
fn decode_toml<T: DeserializeOwned>(s: &str) -> Result<T> {
    let table: toml::Table = toml::from_str(s)?;
    if let Some(toml::Value::String(name)) = table.get("animation") {
        name.parse::<Animation>()?;
    }
    Ok(toml::Value::Table(table).try_into()?)
}

impl StrokeOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        decode_toml(s)
    }

    /// Reject values no stroke can be drawn with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(StrokeError::InvalidInput(msg));

        if !(self.ink_amount > 0.0 && self.ink_amount.is_finite()) {
            return invalid(format!("ink_amount must be positive, got {}", self.ink_amount));
        }
        if !(self.size >= 0.0 && self.size.is_finite()) {
            return invalid(format!("size must not be negative, got {}", self.size));
        }
        for (name, value) in [
            ("frames", self.frames),
            ("duration", self.duration),
            ("delay", self.delay),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(format!("{name} must not be negative, got {value}"));
            }
        }
        for (name, seconds) in [("duration", self.duration), ("delay", self.delay)] {
            if Duration::try_from_secs_f32(seconds).is_err() {
                return invalid(format!("{name} of {seconds}s is out of range"));
            }
        }
        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "region must not be empty, got {}x{}",
                self.width, self.height
            ));
        }
        if !self.tension.is_finite() {
            return invalid("tension must be finite".into());
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing::resolve(self.duration, self.frames, self.frame_animation)
    }

    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.delay.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Whether a pattern source needs rasterizing
    pub fn has_pattern_source(&self) -> bool {
        self.image.is_some() || self.markup.is_some()
    }
}

impl StrokeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        decode_toml(s)
    }

    pub fn on_begin(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.begin = Some(Callback::new(f));
        self
    }

    pub fn on_end(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.end = Some(Callback::new(f));
        self
    }
}
