//! Offline Render Demo
//!
//! Plays a few strokes onto a software pixmap with a manual clock and writes
//! the result as a PNG:
//! - A lifted grid fill across the whole region
//! - A queued curve through explicit points
//! - A queued erase along a path
//!
//! Run with: cargo run -p brushstroke_core --example render_png [out.png]

use brushstroke_core::{Animation, Brushstroke, Easing, ManualClock, StrokeOptions, StrokeOverrides};
use brushstroke_paint::{Color, PixmapSurface};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const DEFAULTS: &str = r##"
width = 480
height = 240
color = "#1d3557"
size = 36
frame_animation = true
duration = 1.5
easing = "ease-in-out-quad"
queue = true
"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let out = std::env::args().nth(1).unwrap_or_else(|| "brushstroke.png".to_string());
    let defaults = StrokeOptions::from_toml_str(DEFAULTS)?;
    let clock = ManualClock::new();

    let mut strokes = Brushstroke::new(PixmapSurface::new(defaults.width, defaults.height)?)
        .with_defaults(defaults)
        .with_rng(StdRng::seed_from_u64(2024))
        .with_clock(clock.clone());

    let _cover = strokes.draw(
        StrokeOverrides::new()
            .color(Color::from_hex(0xa8dadc))
            .lifting(true),
    )?;
    let _curve = strokes.draw(
        StrokeOverrides::new()
            .animation(Animation::Points)
            .points([40.0, 200.0, 160.0, 60.0, 300.0, 180.0, 440.0, 40.0])
            .size(18.0)
            .dripping(true)
            .on_end(|| tracing::info!("Curve finished")),
    )?;
    let mut erase = strokes.erase(
        StrokeOverrides::new()
            .animation(Animation::Path)
            .path("M20 120 C160 20 320 220 460 120")
            .size(24.0)
            .easing(Easing::Linear),
    )?;

    let mut frames = 0u32;
    while !strokes.is_idle() {
        clock.advance_frame(60);
        strokes.frame();
        frames += 1;
    }
    if let Some(Err(err)) = erase.poll_result() {
        return Err(err.into());
    }

    let surface = strokes.into_surface();
    std::fs::write(&out, surface.encode_png()?)?;
    tracing::info!(frames, painted = surface.painted_pixels(), %out, "Wrote image");
    Ok(())
}
