//! Ink particles: bristle hairs and dripping drops

use brushstroke_paint::{Paint, Point, StrokeStyle, Surface};
use rand::{Rng, RngCore};
use uuid::Uuid;

/// One bristle of a brush tip
#[derive(Clone, Debug)]
pub struct Hair {
    position: Point,
    latest: Point,
    ink_amount: f32,
}

impl Hair {
    pub fn new(position: Point, ink_amount: f32) -> Self {
        Self {
            position,
            latest: position,
            ink_amount,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Line width for a tick that moved the brush `distance` units.
    ///
    /// Fast strokes starve the bristle of ink; at rest it paints at
    /// full `ink_amount`.
    pub fn width_for(&self, distance: f32) -> f32 {
        let per = if distance > 0.0 {
            (self.ink_amount / distance).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.ink_amount * per
    }

    /// Move by `(dx, dy)` and paint the trail segment
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        paint: &Paint,
        dx: f32,
        dy: f32,
        distance: f32,
    ) {
        self.latest = self.position;
        self.position.x += dx;
        self.position.y += dy;

        let style = StrokeStyle::round(paint.clone(), self.width_for(distance));
        surface.stroke_segment(self.latest, self.position, &style);
    }
}

/// An ink droplet left behind by a slow brush.
///
/// Drops slide down and sideways on their own until their life runs out.
#[derive(Clone, Debug)]
pub struct InkDrop {
    position: Point,
    latest: Point,
    size: f32,
    life: f32,
    x_off_ratio: f32,
    stroke_id: Uuid,
}

impl InkDrop {
    pub fn new(position: Point, size: f32, stroke_id: Uuid) -> Self {
        Self {
            position,
            latest: position,
            size,
            life: size * 1.5,
            x_off_ratio: 0.0,
            stroke_id,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Stroke that spawned this drop
    pub fn stroke_id(&self) -> Uuid {
        self.stroke_id
    }

    /// Drift, decay and paint the trail segment
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        paint: &Paint,
        rng: &mut dyn RngCore,
    ) {
        if rng.random::<f32>() < 0.03 {
            self.x_off_ratio += 0.06 * rng.random::<f32>() - 0.03;
        } else if rng.random::<f32>() < 0.1 {
            self.x_off_ratio *= 0.003;
        }

        self.latest = self.position;
        self.position.x += self.life * self.x_off_ratio;
        self.position.y += self.life * 0.5 * rng.random::<f32>();

        self.life -= 0.04 * rng.random::<f32>() + 0.01;

        let width = (self.size + self.life * 0.3).max(0.0);
        let style = StrokeStyle::round(paint.clone(), width);
        surface.stroke_segment(self.latest, self.position, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brushstroke_paint::{Color, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hair_width_thins_with_speed() {
        let hair = Hair::new(Point::ZERO, 2.0);
        assert_eq!(hair.width_for(0.0), 0.0);
        assert_eq!(hair.width_for(1.0), 2.0);
        assert_eq!(hair.width_for(2.0), 2.0);
        assert_eq!(hair.width_for(8.0), 0.5);
    }

    #[test]
    fn test_hair_trails_from_previous_position() {
        let mut surface = RecordingSurface::new();
        let mut hair = Hair::new(Point::new(5.0, 5.0), 1.0);
        hair.render(&mut surface, &Color::BLACK.into(), 3.0, 4.0, 5.0);

        let segments: Vec<_> = surface.segments().collect();
        assert_eq!(
            segments,
            vec![(Point::new(5.0, 5.0), Point::new(8.0, 9.0), 0.2)]
        );
        assert_eq!(hair.position(), Point::new(8.0, 9.0));
    }

    #[test]
    fn test_drop_life_strictly_decreases() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut surface = RecordingSurface::new();
        let paint = Paint::from(Color::BLACK);
        let mut drop = InkDrop::new(Point::new(10.0, 10.0), 2.0, Uuid::nil());
        assert_eq!(drop.life(), 3.0);

        let mut renders = 0;
        while drop.is_alive() {
            let before = drop.life();
            drop.render(&mut surface, &paint, &mut rng);
            assert!(drop.life() < before);
            assert!(drop.position().y >= 10.0);
            renders += 1;
        }
        // Each render decays by at most 0.05
        assert!(renders >= 60);
        assert!(surface.segments().all(|(_, _, width)| width >= 0.0));
    }
}
