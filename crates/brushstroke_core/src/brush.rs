//! The brush: a tip of hairs plus the drops it leaves behind
//!
//! A [`Brush`] is moved to a new target once per tick with [`Brush::render`]. While
//! a stroke is active every hair paints the distance travelled; fast moves splash
//! ink around the tip and slow moves occasionally drip.

use std::f32::consts::PI;

use brushstroke_paint::{Circle, Color, Paint, Point, Surface};
use rand::{Rng, RngCore};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::ink::{Hair, InkDrop};

/// Travel per tick above which a splashing brush throws splatter
pub const SPLASHING_BRUSH_SPEED: f32 = 75.0;

/// Upper bound on tip hairs
pub const MAX_HAIRS: usize = 1000;

/// Brush appearance and behaviour
#[derive(Clone, Debug)]
pub struct BrushSettings {
    pub paint: Paint,
    /// Tip diameter
    pub size: f32,
    pub ink_amount: f32,
    /// Tip tilt in radians
    pub angle: f32,
    pub dripping: bool,
    pub splashing: bool,
    pub max_hairs: usize,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            paint: Paint::Color(Color::BLACK),
            size: 35.0,
            ink_amount: 7.0,
            angle: 0.0,
            dripping: true,
            splashing: true,
            max_hairs: MAX_HAIRS,
        }
    }
}

impl BrushSettings {
    /// Number of hairs a fresh tip gets: the tip disc area over the ink
    /// amount, clamped to `1..=max_hairs`
    pub fn hair_count(&self) -> usize {
        let rad = self.size * 0.5;
        let count = (rad * rad * PI / self.ink_amount).round();
        // NaN and negative counts saturate to 0
        (count as usize).clamp(1, self.max_hairs.max(1))
    }
}

#[derive(Debug)]
pub struct Brush {
    settings: BrushSettings,
    position: Point,
    latest: Option<Point>,
    stroke_id: Option<Uuid>,
    tip: Vec<Hair>,
    drops: Vec<InkDrop>,
}

impl Brush {
    pub fn new(position: Point, settings: BrushSettings, rng: &mut dyn RngCore) -> Self {
        let mut brush = Self {
            settings,
            position,
            latest: None,
            stroke_id: None,
            tip: Vec::new(),
            drops: Vec::new(),
        };
        brush.reset_tip(rng);
        brush
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Position before the latest render
    pub fn latest_position(&self) -> Option<Point> {
        self.latest
    }

    pub fn is_stroke(&self) -> bool {
        self.stroke_id.is_some()
    }

    pub fn stroke_id(&self) -> Option<Uuid> {
        self.stroke_id
    }

    pub fn hairs(&self) -> &[Hair] {
        &self.tip
    }

    pub fn drops(&self) -> &[InkDrop] {
        &self.drops
    }

    /// Begin a stroke with a fresh tip. Does nothing while a stroke is active.
    pub fn start_stroke(&mut self, rng: &mut dyn RngCore) {
        if self.is_stroke() {
            return;
        }
        self.reset_tip(rng);
        self.stroke_id = Some(uuid::Builder::from_random_bytes(rng.random()).into_uuid());
    }

    pub fn end_stroke(&mut self) {
        self.stroke_id = None;
        self.latest = None;
    }

    /// Move the brush to `target` and paint the movement
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        target: Point,
        rng: &mut dyn RngCore,
    ) {
        let latest = self.position;
        self.latest = Some(latest);
        self.position = target;

        let in_stroke = self.is_stroke();
        let stroke_id = self.stroke_id;
        let position = self.position;
        let paint = &self.settings.paint;
        let size_sq = self.settings.size * self.settings.size;

        // The tip wipes drops left by other strokes; its own trail stays
        self.drops.retain_mut(|drop| {
            let dx = position.x - drop.position().x;
            let dy = position.y - drop.position().y;
            let wiped = in_stroke
                && size_sq > dx * dx + dy * dy
                && stroke_id != Some(drop.stroke_id());
            if wiped || !drop.is_alive() {
                return false;
            }
            drop.render(surface, paint, rng);
            true
        });

        let Some(stroke_id) = stroke_id else {
            return;
        };

        let dx = position.x - latest.x;
        let dy = position.y - latest.y;
        let dist = (dx * dx + dy * dy).sqrt();
        let ink = self.settings.ink_amount;

        if self.settings.splashing && dist > SPLASHING_BRUSH_SPEED {
            let max_num = ((dist - SPLASHING_BRUSH_SPEED) * 0.5) as u32;
            let count = (max_num as f32 * rng.random::<f32>()) as usize;
            let splatter: SmallVec<[Circle; 16]> = (0..count)
                .map(|_| {
                    let r = (dist - 1.0) * rng.random::<f32>() + 1.0;
                    let a = PI * 2.0 * rng.random::<f32>();
                    let sr = 5.0 * rng.random::<f32>();
                    Circle::new(
                        Point::new(position.x + r * a.sin(), position.y + r * a.cos()),
                        sr,
                    )
                })
                .collect();
            if !splatter.is_empty() {
                surface.fill_circles(&splatter, paint);
            }
        } else if self.settings.dripping
            && dist < ink * 2.0
            && rng.random::<f32>() < 0.05
        {
            let size = (self.settings.size + ink) * 0.5 * (0.15 * rng.random::<f32>() + 0.1);
            self.drops.push(InkDrop::new(position, size, stroke_id));
        }

        for hair in &mut self.tip {
            hair.render(surface, paint, dx, dy, dist);
        }
    }

    /// Drop every hair and drop
    pub fn dispose(&mut self) {
        self.tip.clear();
        self.drops.clear();
    }

    /// Lay out a fresh tip: hairs scattered over an ellipse around the
    /// position, rotated by the tilt angle
    fn reset_tip(&mut self, rng: &mut dyn RngCore) {
        let rad = self.settings.size * 0.5;
        let (sv, cv) = self.settings.angle.sin_cos();
        let count = self.settings.hair_count();

        self.tip.clear();
        self.tip.reserve(count);
        for _ in 0..count {
            let x0 = rad * rng.random::<f32>();
            let y0 = x0 * 0.5;
            let a0 = PI * 2.0 * rng.random::<f32>();
            let x1 = x0 * a0.sin();
            let y1 = y0 * a0.cos();
            self.tip.push(Hair::new(
                Point::new(
                    self.position.x + x1 * cv - y1 * sv,
                    self.position.y + x1 * sv + y1 * cv,
                ),
                self.settings.ink_amount,
            ));
        }
    }

    #[cfg(test)]
    pub(crate) fn push_drop(&mut self, drop: InkDrop) {
        self.drops.push(drop);
    }
}
