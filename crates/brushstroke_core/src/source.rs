//! Point source resolution
//!
//! Turns the options of a task into the route(s) a brush follows.

use brushstroke_paint::{Path, PathMeasure, Point, DEFAULT_TOLERANCE};
use rand::{Rng, RngCore};

use crate::curve::{curve, DensePath, DEFAULT_SEGMENTS};
use crate::error::{Result, StrokeError};
use crate::options::{Animation, PathSource, PointSource, StrokeOptions};
use crate::positioner::{Coverage, Pass};

/// Random points generated when no count is given
pub const DEFAULT_RANDOM_POINTS: u32 = 10;

/// What the brush follows during one playback
#[derive(Clone, Debug)]
pub enum Route {
    /// Spline-densified points, looked up by index
    Dense(DensePath),
    /// A measured path, looked up by arc length
    Measured(PathMeasure),
    /// A straight move
    Line { from: Point, to: Point },
}

impl Route {
    /// Where the brush starts
    pub fn start(&self) -> Point {
        match self {
            Route::Dense(dense) => dense.first().unwrap_or(Point::ZERO),
            Route::Measured(measure) => measure.point_at_length(0.0),
            Route::Line { from, .. } => *from,
        }
    }

    /// Target at eased progress `t`
    pub fn point_at(&self, t: f32) -> Point {
        match self {
            Route::Dense(dense) => dense.point_at(t).unwrap_or(Point::ZERO),
            Route::Measured(measure) => measure.point_at_length(measure.length() * t),
            Route::Line { from, to } => from.lerp(*to, t),
        }
    }
}

/// Resolved drawing plan of a task
#[derive(Clone, Debug)]
pub enum Plan {
    /// One continuous stroke
    Single { route: Route, angle: f32 },
    /// Separate straight strokes drawn one after another
    Lifted { passes: Vec<Pass>, angle: f32 },
}

impl Plan {
    pub fn resolve(options: &StrokeOptions, rng: &mut dyn RngCore) -> Result<Self> {
        match options.animation {
            Animation::Points => {
                let controls = match &options.points {
                    Some(PointSource::Explicit(points)) => points.clone(),
                    Some(PointSource::Random(count)) => {
                        random_points(*count, options.width, options.height, rng)
                    }
                    None => random_points(0, options.width, options.height, rng),
                };
                let dense = curve(&controls, options.tension, DEFAULT_SEGMENTS, false)?;
                tracing::trace!(
                    controls = controls.len() / 2,
                    dense = dense.point_count(),
                    "Resolved point source"
                );
                Ok(Plan::Single {
                    route: Route::Dense(dense),
                    angle: options.angle,
                })
            }
            Animation::Path => {
                let path = match &options.path {
                    Some(PathSource::Data(data)) => Path::from_svg_data(data)?,
                    Some(PathSource::Path(path)) => path.clone(),
                    None => {
                        return Err(StrokeError::InvalidInput(
                            "`path` animation needs a path".into(),
                        ))
                    }
                };
                let measure = PathMeasure::new(&path, DEFAULT_TOLERANCE)?;
                tracing::trace!(length = measure.length(), "Resolved path source");
                Ok(Plan::Single {
                    route: Route::Measured(measure),
                    angle: options.angle,
                })
            }
            Animation::ToTop | Animation::ToBottom | Animation::ToLeft | Animation::ToRight => {
                let Some(direction) = options.animation.direction() else {
                    return Err(StrokeError::Unsupported(format!(
                        "no coverage direction for {:?}",
                        options.animation
                    )));
                };
                let coverage = Coverage {
                    direction,
                    width: options.width as f32,
                    height: options.height as f32,
                    size: options.size,
                    overlap: options.overlap,
                    padding: options.padding,
                };
                if options.lifting {
                    let plan = coverage.plan()?;
                    Ok(Plan::Lifted {
                        passes: plan.passes,
                        angle: plan.angle,
                    })
                } else {
                    let plan = coverage.plan_continuous(options.reduce_overflow)?;
                    let dense = curve(
                        &plan.control_points(),
                        options.tension,
                        DEFAULT_SEGMENTS,
                        false,
                    )?;
                    Ok(Plan::Single {
                        route: Route::Dense(dense),
                        angle: plan.angle,
                    })
                }
            }
        }
    }
}

/// `count` random points inside a `width`x`height` region, keeping a 5% margin.
///
/// A count of 0 draws [`DEFAULT_RANDOM_POINTS`].
pub fn random_points(count: u32, width: u32, height: u32, rng: &mut dyn RngCore) -> Vec<f32> {
    let count = if count == 0 {
        DEFAULT_RANDOM_POINTS
    } else {
        count
    };
    let (w, h) = (width as f32, height as f32);
    let mut points = Vec::with_capacity(count as usize * 2);
    for _ in 0..count {
        points.push((w * rng.random::<f32>() * 0.9 + w * 0.05).trunc());
        points.push((h * rng.random::<f32>() * 0.9 + h * 0.05).trunc());
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::StrokeOverrides;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn resolve(overrides: StrokeOverrides) -> Result<Plan> {
        let options = StrokeOptions::default().merged(overrides);
        Plan::resolve(&options, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_random_points_stay_inside_margin() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = random_points(0, 300, 120, &mut rng);
        assert_eq!(points.len(), 20);
        for xy in points.chunks(2) {
            assert!(xy[0] >= 15.0 && xy[0] < 285.0);
            assert!(xy[1] >= 6.0 && xy[1] < 114.0);
            assert_eq!(xy[0].fract(), 0.0);
        }
        assert_eq!(random_points(4, 10, 10, &mut rng).len(), 8);
    }

    #[test]
    fn test_points_route_starts_at_first_point() {
        let plan = resolve(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([5.0, 6.0, 50.0, 60.0, 90.0, 10.0]),
        )
        .unwrap();
        let Plan::Single { route, angle } = plan else {
            panic!("expected a single route");
        };
        assert_eq!(angle, 0.0);
        assert_eq!(route.start(), Point::new(5.0, 6.0));
        assert_eq!(route.point_at(1.0), Point::new(90.0, 10.0));
        let Route::Dense(dense) = route else {
            panic!("expected a dense route");
        };
        assert_eq!(dense.len(), 4 * 25 + 2);
    }

    #[test]
    fn test_points_default_to_random() {
        let plan = resolve(StrokeOverrides::new().animation(Animation::Points)).unwrap();
        let Plan::Single {
            route: Route::Dense(dense),
            ..
        } = plan
        else {
            panic!("expected a dense route");
        };
        assert_eq!(dense.len(), 18 * 25 + 2);
    }

    #[test]
    fn test_path_route_uses_arc_length() {
        let plan = resolve(
            StrokeOverrides::new()
                .animation(Animation::Path)
                .path("M10 10 H110"),
        )
        .unwrap();
        let Plan::Single { route, .. } = plan else {
            panic!("expected a single route");
        };
        assert_eq!(route.start(), Point::new(10.0, 10.0));
        let mid = route.point_at(0.5);
        assert!((mid.x - 60.0).abs() < 1e-3);
        assert_eq!(route.point_at(1.0), Point::new(110.0, 10.0));
    }

    #[test]
    fn test_path_errors() {
        assert!(matches!(
            resolve(StrokeOverrides::new().animation(Animation::Path)),
            Err(StrokeError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve(
                StrokeOverrides::new()
                    .animation(Animation::Path)
                    .path("M 0 0 L 10 oops")
            ),
            Err(StrokeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_coverage_plans() {
        let continuous = resolve(StrokeOverrides::new()).unwrap();
        let Plan::Single {
            route: Route::Dense(dense),
            angle,
        } = continuous
        else {
            panic!("expected a dense route");
        };
        assert_eq!(angle, std::f32::consts::FRAC_PI_2);
        // 3 passes, 6 control points
        assert_eq!(dense.len(), 10 * 25 + 2);

        let lifted = resolve(StrokeOverrides::new().lifting(true)).unwrap();
        let Plan::Lifted { passes, .. } = lifted else {
            panic!("expected lifted passes");
        };
        assert_eq!(passes.len(), 3);
    }

    #[test]
    fn test_line_route_interpolates() {
        let route = Route::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 50.0),
        };
        assert_eq!(route.point_at(0.5), Point::new(50.0, 25.0));
        assert_eq!(route.start(), Point::ZERO);
    }
}
