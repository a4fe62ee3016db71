//! Integration tests for stroke playback
//!
//! These tests drive whole strokes through [`Brushstroke`] and check what lands
//! on the surface:
//! - Frame-counted strokes reach their last control point
//! - Erasing removes ink and restores compositing, even when erases overlap
//! - Coverage with lifting draws every pass but fires hooks once
//! - Delays and per-frame animation follow the clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use brushstroke_core::{
    Animation, Brushstroke, ManualClock, StrokeError, StrokeOverrides, MAX_HAIRS,
};
use brushstroke_paint::{
    Color, CompositeMode, PaintCommand, PixmapSurface, Point, RecordingSurface, Surface,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn recording() -> (Brushstroke<RecordingSurface>, ManualClock) {
    let clock = ManualClock::new();
    let strokes = Brushstroke::new(RecordingSurface::new())
        .with_rng(StdRng::seed_from_u64(7))
        .with_clock(clock.clone());
    (strokes, clock)
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

/// A single-hair brush follows the route exactly
#[test]
fn test_frame_counted_line_reaches_the_end() {
    let (mut strokes, _) = recording();
    let (ends, on_end) = counter();

    let mut signal = strokes
        .draw(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([0.0, 0.0, 100.0, 0.0])
                .frames(10.0)
                .size(0.0)
                .on_end(on_end),
        )
        .unwrap();

    // Frames without frame animation all run inside `draw`
    assert_eq!(signal.poll_result(), Some(Ok(())));
    assert_eq!(signal.poll_result(), Some(Ok(())));
    assert_eq!(ends.load(Ordering::SeqCst), 1);

    let segments: Vec<_> = strokes.surface().segments().collect();
    assert_eq!(segments.len(), 10);
    let (_, last, _) = segments[segments.len() - 1];
    assert!((last.x - 100.0).abs() < 1e-3, "ended at {last:?}");
    assert!(last.y.abs() < 1e-3, "ended at {last:?}");

    // Progress only moves forward
    for (from, to, _) in &segments {
        assert!(to.x >= from.x - 1e-3);
    }
}

#[test]
fn test_erase_restores_transparency() {
    let surface = PixmapSurface::new(60, 40).unwrap();
    let mut strokes = Brushstroke::new(surface).with_rng(StdRng::seed_from_u64(42));

    let line = || {
        StrokeOverrides::new()
            .animation(Animation::Points)
            .points([20.0, 20.0, 40.0, 20.0])
            .splashing(false)
            .dripping(false)
    };

    let mut drawn = strokes
        .draw(
            line()
                .color(Color::BLACK)
                .size(4.0)
                .ink_amount(2.0)
                .frames(20.0),
        )
        .unwrap();
    assert!(drawn.is_resolved());
    assert!(strokes.surface().painted_pixels() > 0);

    let mut erased = strokes
        .erase(line().size(40.0).ink_amount(40.0).frames(30.0))
        .unwrap();
    assert_eq!(erased.poll_result(), Some(Ok(())));
    assert!(strokes.surface().is_transparent());
    assert_eq!(strokes.surface().composite_mode(), CompositeMode::SourceOver);
}

#[test]
fn test_erase_brackets_playback_with_destination_out() {
    let (mut strokes, _) = recording();
    let _signal = strokes
        .erase(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([0.0, 0.0, 30.0, 30.0])
                .size(4.0),
        )
        .unwrap();

    let commands = strokes.surface().commands();
    assert!(matches!(
        commands.first(),
        Some(PaintCommand::SetCompositeMode(CompositeMode::DestinationOut))
    ));
    assert!(matches!(
        commands.last(),
        Some(PaintCommand::SetCompositeMode(CompositeMode::SourceOver))
    ));
    assert!(strokes.surface().segments().count() > 0);
}

#[test]
fn test_overlapping_erases_keep_destination_out_until_the_last_ends() {
    let surface = PixmapSurface::new(60, 40).unwrap();
    let mut strokes = Brushstroke::new(surface)
        .with_rng(StdRng::seed_from_u64(11))
        .with_clock(ManualClock::new());

    let wipe = |frames: f32| {
        StrokeOverrides::new()
            .animation(Animation::Points)
            .points([10.0, 20.0, 50.0, 20.0])
            .size(4.0)
            .frames(frames)
            .frame_animation(true)
            .splashing(false)
    };
    let mut short = strokes.erase(wipe(2.0)).unwrap();
    let mut long = strokes.erase(wipe(4.0)).unwrap();
    assert_eq!(strokes.surface().composite_mode(), CompositeMode::DestinationOut);

    strokes.frame();
    assert!(short.is_resolved());
    assert!(!long.is_resolved());
    assert_eq!(strokes.surface().composite_mode(), CompositeMode::DestinationOut);
    // Ink laid down while the longer erase is still running gets removed
    assert_eq!(strokes.surface().painted_pixels(), 0);

    for _ in 0..4 {
        strokes.frame();
    }
    assert!(long.is_resolved());
    assert_eq!(strokes.surface().composite_mode(), CompositeMode::SourceOver);

    let mut drawn = strokes
        .draw(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([10.0, 20.0, 50.0, 20.0])
                .color(Color::BLACK)
                .size(4.0)
                .splashing(false)
                .dripping(false),
        )
        .unwrap();
    assert!(drawn.is_resolved());
    assert!(strokes.surface().painted_pixels() > 0);
}

#[test]
fn test_lifted_coverage_fires_hooks_once() {
    let (mut strokes, _) = recording();
    let (begins, on_begin) = counter();
    let (ends, on_end) = counter();

    let mut signal = strokes
        .draw(
            StrokeOverrides::new()
                .lifting(true)
                .frames(30.0)
                .on_begin(on_begin)
                .on_end(on_end),
        )
        .unwrap();

    assert!(signal.is_resolved());
    assert_eq!(begins.load(Ordering::SeqCst), 1);
    assert_eq!(ends.load(Ordering::SeqCst), 1);
    // Three passes of ten frames each; every hair paints every step
    let hairs = ((20.0f32 * 20.0 * std::f32::consts::PI).round() as usize).min(MAX_HAIRS);
    assert_eq!(strokes.surface().segments().count(), 3 * 10 * hairs);
}

#[test]
fn test_lifted_passes_share_frames() {
    let (mut strokes, _) = recording();
    let mut signal = strokes
        .draw(
            StrokeOverrides::new()
                .lifting(true)
                .frames(6.0)
                .frame_animation(true)
                .splashing(false),
        )
        .unwrap();

    strokes.frame();
    strokes.frame();
    assert!(!signal.is_resolved());
    strokes.frame();
    assert!(signal.is_resolved());
    assert!(strokes.is_idle());
}

#[test]
fn test_continuous_coverage_spans_the_region() {
    let (mut strokes, _) = recording();
    let _signal = strokes
        .draw(
            StrokeOverrides::new()
                .size(4.0)
                .width(100)
                .height(40)
                .padding(0.0)
                .overlap(0.0)
                .frames(200.0)
                .splashing(false),
        )
        .unwrap();

    let ys: Vec<f32> = strokes.surface().segments().map(|(_, to, _)| to.y).collect();
    let top = ys.iter().cloned().fold(f32::INFINITY, f32::min);
    let bottom = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(top < 10.0, "top {top}");
    assert!(bottom > 30.0, "bottom {bottom}");
}

#[test]
fn test_delay_then_duration() {
    let (mut strokes, clock) = recording();
    let (begins, on_begin) = counter();

    let mut signal = strokes
        .draw(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([0.0, 0.0, 50.0, 50.0])
                .delay(1.0)
                .duration(0.5)
                .on_begin(on_begin),
        )
        .unwrap();
    assert_eq!(begins.load(Ordering::SeqCst), 0);

    clock.advance(Duration::from_millis(999));
    strokes.frame();
    assert_eq!(begins.load(Ordering::SeqCst), 0);
    assert!(strokes.surface().commands().is_empty());

    clock.advance(Duration::from_millis(1));
    strokes.frame();
    assert_eq!(begins.load(Ordering::SeqCst), 1);
    assert!(!signal.is_resolved());

    clock.advance(Duration::from_millis(250));
    strokes.frame();
    assert!(!signal.is_resolved());

    clock.advance(Duration::from_millis(300));
    strokes.frame();
    assert_eq!(signal.poll_result(), Some(Ok(())));
}

#[test]
fn test_path_stroke_follows_svg_data() {
    let (mut strokes, _) = recording();
    let _signal = strokes
        .draw(
            StrokeOverrides::new()
                .animation(Animation::Path)
                .path("M10 10 H60 V40")
                .size(0.0)
                .frames(8.0),
        )
        .unwrap();

    let last = strokes.surface().segments().last().map(|(_, to, _)| to);
    let Some(Point { x, y }) = last else {
        panic!("nothing drawn");
    };
    assert!((x - 60.0).abs() < 1e-2 && (y - 40.0).abs() < 1e-2);
}

#[test]
fn test_bad_input_reports_synchronously() {
    let (mut strokes, _) = recording();
    assert!(matches!(
        strokes.draw(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([0.0, 0.0])
        ),
        Err(StrokeError::InvalidInput(_))
    ));
    assert!(matches!(
        strokes.draw(StrokeOverrides::new().size(10.0).overlap(10.0)),
        Err(StrokeError::InvalidInput(_))
    ));
    assert!(matches!(
        strokes.draw(StrokeOverrides::new().ink_amount(0.0)),
        Err(StrokeError::InvalidInput(_))
    ));
    assert!(matches!(
        strokes.draw(
            StrokeOverrides::new()
                .animation(Animation::Points)
                .points([0.0, 0.0, 10.0, 0.0])
                .delay(1e20)
        ),
        Err(StrokeError::InvalidInput(_))
    ));
    assert!(strokes.is_idle());
}
