//! Cardinal spline interpolation
//!
//! Turns a sparse, flattened control point list (`[x0, y0, x1, y1, ...]`) into a
//! dense path sampled at uniform parameter steps between every pair of
//! consecutive control points.

use brushstroke_paint::Point;

use crate::error::{Result, StrokeError};

/// Default spline tension
pub const DEFAULT_TENSION: f32 = 0.5;

/// Default samples per span
pub const DEFAULT_SEGMENTS: usize = 25;

/// Hermite basis weights for one parameter value
#[derive(Clone, Copy, Debug)]
struct Basis {
    c1: f32,
    c2: f32,
    c3: f32,
    c4: f32,
}

impl Basis {
    fn at(t: f32) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t23 = t3 * 2.0;
        let t32 = t2 * 3.0;
        Self {
            c1: t23 - t32 + 1.0,
            c2: t32 - t23,
            c3: t3 - 2.0 * t2 + t,
            c4: t3 - t2,
        }
    }
}

/// Interpolated output of [`curve`].
///
/// The buffer is flattened `x, y` pairs; it always holds
/// `(controls - 2) * segments + 2` floats, plus `2 * segments` when closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DensePath {
    data: Vec<f32>,
}

impl DensePath {
    /// Flattened coordinates
    pub fn as_floats(&self) -> &[f32] {
        &self.data
    }

    pub fn points(&self) -> &[Point] {
        bytemuck::cast_slice(&self.data)
    }

    /// Number of floats in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.data.len() / 2
    }

    pub fn first(&self) -> Option<Point> {
        self.points().first().copied()
    }

    /// Point nearest to progress `t`: index `round(count * t)`, clamped to
    /// the last point
    pub fn point_at(&self, t: f32) -> Option<Point> {
        let points = self.points();
        let last = points.len().checked_sub(1)?;
        let idx = (points.len() as f32 * t).round().max(0.0) as usize;
        Some(points[idx.min(last)])
    }

    pub fn into_floats(self) -> Vec<f32> {
        self.data
    }
}

/// Interpolate `points` with a cardinal spline.
///
/// `tension` scales the tangents (`tension * (next - previous)`); values outside
/// `[0, 1]` are accepted and overshoot further. Every control point appears in
/// the output at its span boundary. With `closed` the last control point is
/// joined back to the first and the output ends on the first point.
pub fn curve(points: &[f32], tension: f32, segments: usize, closed: bool) -> Result<DensePath> {
    let l = points.len();
    if l < 4 || l % 2 != 0 {
        return Err(StrokeError::InvalidInput(format!(
            "control points need an even number of coordinates, at least 4 (got {l})"
        )));
    }
    if segments == 0 {
        return Err(StrokeError::InvalidInput(
            "segments per span must be at least 1".into(),
        ));
    }
    if !tension.is_finite() || points.iter().any(|v| !v.is_finite()) {
        return Err(StrokeError::InvalidInput(
            "control points and tension must be finite".into(),
        ));
    }

    // Weights depend only on t, so every span shares them
    let cache: Vec<Basis> = (0..segments)
        .map(|i| Basis::at(i as f32 / segments as f32))
        .collect();

    let capacity = (l - 2) * segments + 2 + if closed { 2 * segments } else { 0 };
    let mut out = Vec::with_capacity(capacity);

    // Pad both ends so every span has a previous and a next neighbour
    let mut padded = Vec::with_capacity(l + 4);
    if closed {
        padded.extend_from_slice(&points[l - 2..]);
        padded.extend_from_slice(points);
        padded.extend_from_slice(&points[..2]);
    } else {
        padded.extend_from_slice(&points[..2]);
        padded.extend_from_slice(points);
        padded.extend_from_slice(&points[l - 2..]);
    }
    interpolate(&padded, l, &cache, tension, &mut out);

    if closed {
        let wrap = [
            points[l - 4],
            points[l - 3],
            points[l - 2],
            points[l - 1],
            points[0],
            points[1],
            points[2],
            points[3],
        ];
        interpolate(&wrap, 4, &cache, tension, &mut out);
    }

    let last = if closed { 0 } else { l - 2 };
    out.push(points[last]);
    out.push(points[last + 1]);

    debug_assert_eq!(out.len(), capacity);
    Ok(DensePath { data: out })
}

/// Blend every span of a padded sequence whose unpadded length is `l`
fn interpolate(pts: &[f32], l: usize, cache: &[Basis], tension: f32, out: &mut Vec<f32>) {
    for i in (2..l).step_by(2) {
        let (x1, y1) = (pts[i], pts[i + 1]);
        let (x2, y2) = (pts[i + 2], pts[i + 3]);

        let t1x = (x2 - pts[i - 2]) * tension;
        let t1y = (y2 - pts[i - 1]) * tension;
        let t2x = (pts[i + 4] - x1) * tension;
        let t2y = (pts[i + 5] - y1) * tension;

        for b in cache {
            out.push(b.c1 * x1 + b.c2 * x2 + b.c3 * t1x + b.c4 * t2x);
            out.push(b.c1 * y1 + b.c2 * y2 + b.c3 * t1y + b.c4 * t2y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZIGZAG: [f32; 10] = [0.0, 0.0, 50.0, 80.0, 100.0, 10.0, 150.0, 90.0, 200.0, 0.0];

    #[test]
    fn test_open_length() {
        for segments in [1, 5, 25] {
            let dense = curve(&ZIGZAG, DEFAULT_TENSION, segments, false).unwrap();
            assert_eq!(dense.len(), (ZIGZAG.len() - 2) * segments + 2);
        }
    }

    #[test]
    fn test_closed_length() {
        let dense = curve(&ZIGZAG, DEFAULT_TENSION, 25, true).unwrap();
        assert_eq!(dense.len(), (ZIGZAG.len() - 2) * 25 + 2 + 2 * 25);
        assert_eq!(dense.points().last(), Some(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_closed_wrap_has_no_jump() {
        let segments = 25;
        let dense = curve(&ZIGZAG, DEFAULT_TENSION, segments, true).unwrap();
        let points = dense.points();

        let controls: Vec<Point> = ZIGZAG.chunks(2).map(|c| Point::new(c[0], c[1])).collect();
        let longest_chord = controls
            .iter()
            .zip(controls.iter().cycle().skip(1))
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, f32::max);
        // Hermite speed stays under 3.5 chords with tension 0.5
        let bound = 4.0 * longest_chord / segments as f32;

        let wrap = [points[points.len() - 1], points[0]];
        for pair in points.windows(2).chain(std::iter::once(&wrap[..])) {
            let step = pair[0].distance(pair[1]);
            assert!(step <= bound, "step {step} from {:?} to {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_passes_through_controls() {
        let segments = 25;
        let dense = curve(&ZIGZAG, DEFAULT_TENSION, segments, false).unwrap();
        let points = dense.points();
        for (k, control) in ZIGZAG.chunks(2).enumerate() {
            let p = points[k * segments];
            assert!((p.x - control[0]).abs() < 1e-4, "x at control {k}");
            assert!((p.y - control[1]).abs() < 1e-4, "y at control {k}");
        }
    }

    #[test]
    fn test_two_points_make_a_line() {
        let dense = curve(&[0.0, 0.0, 100.0, 0.0], DEFAULT_TENSION, 10, false).unwrap();
        assert_eq!(dense.point_count(), 11);
        assert!(dense.points().iter().all(|p| p.y == 0.0));
        assert_eq!(dense.first(), Some(Point::new(0.0, 0.0)));
        assert_eq!(dense.point_at(1.0), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_point_at_rounds_and_clamps() {
        let dense = curve(&[0.0, 0.0, 100.0, 0.0], DEFAULT_TENSION, 10, false).unwrap();
        // 11 points: round(11 * 0.5) = 6 (round half away from zero)
        assert_eq!(dense.point_at(0.5), Some(dense.points()[6]));
        assert_eq!(dense.point_at(-0.3), dense.first());
        assert_eq!(dense.point_at(3.0), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            curve(&[0.0, 0.0, 1.0], 0.5, 25, false),
            Err(StrokeError::InvalidInput(_))
        ));
        assert!(curve(&[0.0, 0.0], 0.5, 25, false).is_err());
        assert!(curve(&[0.0, 0.0, 1.0, 1.0], 0.5, 0, false).is_err());
        assert!(curve(&[0.0, f32::NAN, 1.0, 1.0], 0.5, 25, false).is_err());
    }
}
