//! Edge-to-edge coverage of a rectangle with overlapping straight passes
//!
//! Passes alternate direction (boustrophedon) and advance by `size - overlap`
//! toward the travel direction.

use std::f32::consts::FRAC_PI_2;

use brushstroke_paint::Point;
use serde::Deserialize;

use crate::error::{Result, StrokeError};

/// Which way the passes advance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    ToTop,
    ToBottom,
    ToLeft,
    ToRight,
}

impl Direction {
    /// Passes stack vertically (each pass runs horizontally)
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::ToTop | Direction::ToBottom)
    }
}

/// One straight pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pass {
    pub start: Point,
    pub end: Point,
}

/// Coverage geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coverage {
    pub direction: Direction,
    pub width: f32,
    pub height: f32,
    /// Brush diameter
    pub size: f32,
    pub overlap: f32,
    pub padding: f32,
}

/// The passes covering a rectangle
#[derive(Clone, Debug, PartialEq)]
pub struct StrokePlan {
    pub direction: Direction,
    /// Brush tilt for every pass
    pub angle: f32,
    pub passes: Vec<Pass>,
}

impl Coverage {
    fn step(&self) -> f32 {
        self.size - self.overlap
    }

    /// Number of passes needed to cover the rectangle
    pub fn pass_count(&self) -> Result<u32> {
        let step = self.step();
        if !(step > 0.0) {
            return Err(StrokeError::InvalidInput(format!(
                "brush size ({}) must exceed overlap ({})",
                self.size, self.overlap
            )));
        }
        let extent = if self.direction.is_vertical() {
            self.height
        } else {
            self.width
        };
        let count = ((extent + self.size / 2.0 - self.padding * 2.0) / step).ceil();
        if count < 1.0 {
            tracing::warn!(
                extent,
                padding = self.padding,
                "Region too small for coverage, drawing a single pass"
            );
            return Ok(1);
        }
        Ok(count as u32)
    }

    /// Plan the passes without overflow adjustment
    pub fn plan(&self) -> Result<StrokePlan> {
        let count = self.pass_count()?;
        let mut cursor = Cursor::first(self);
        let mut passes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            passes.push(cursor.pass());
            cursor.next(self);
        }
        Ok(self.finish(passes))
    }

    /// Plan passes for one continuous stroke.
    ///
    /// The end of the first pass is pulled back by `reduce_overflow`, the
    /// second pushed out and the last restored toward the edge, so the
    /// turns do not square off at the corners. Each adjusted end is where
    /// the following pass starts.
    pub fn plan_continuous(&self, reduce_overflow: f32) -> Result<StrokePlan> {
        let count = self.pass_count()?;
        let vertical = self.direction.is_vertical();
        let mut cursor = Cursor::first(self);
        let mut passes = Vec::with_capacity(count as usize);
        let mut alt = true;

        for i in 0..count {
            if reduce_overflow != 0.0 {
                let end = if vertical {
                    &mut cursor.end.x
                } else {
                    &mut cursor.end.y
                };
                if i == 0 {
                    *end -= reduce_overflow;
                }
                if i == 1 {
                    *end += reduce_overflow;
                }
                if i == count - 1 {
                    if alt {
                        *end += reduce_overflow;
                    } else {
                        *end -= reduce_overflow;
                    }
                }
            }
            passes.push(cursor.pass());
            cursor.next(self);
            alt = !alt;
        }
        Ok(self.finish(passes))
    }

    fn finish(&self, passes: Vec<Pass>) -> StrokePlan {
        tracing::trace!(direction = ?self.direction, passes = passes.len(), "Planned coverage");
        StrokePlan {
            direction: self.direction,
            angle: if self.direction.is_vertical() {
                FRAC_PI_2
            } else {
                0.0
            },
            passes,
        }
    }
}

impl StrokePlan {
    /// Pass endpoints flattened as control points
    pub fn control_points(&self) -> Vec<f32> {
        self.passes
            .iter()
            .flat_map(|p| [p.start.x, p.start.y, p.end.x, p.end.y])
            .collect()
    }
}

/// Moving pass cursor; the end of one pass becomes the start of the next
struct Cursor {
    start: Point,
    end: Point,
}

impl Cursor {
    fn first(c: &Coverage) -> Self {
        let (w, h, p) = (c.width, c.height, c.padding);
        match c.direction {
            Direction::ToBottom => Self {
                start: Point::new(p, p),
                end: Point::new(w - p, p),
            },
            Direction::ToTop => Self {
                start: Point::new(p, h - p),
                end: Point::new(w - p, h - p),
            },
            Direction::ToRight => Self {
                start: Point::new(p, p),
                end: Point::new(p, h - p),
            },
            Direction::ToLeft => Self {
                start: Point::new(w - p, p),
                end: Point::new(w - p, h - p),
            },
        }
    }

    fn pass(&self) -> Pass {
        Pass {
            start: self.start,
            end: self.end,
        }
    }

    fn next(&mut self, c: &Coverage) {
        let step = c.step();
        match c.direction {
            Direction::ToBottom | Direction::ToTop => {
                self.start.y += if c.direction == Direction::ToBottom {
                    step
                } else {
                    -step
                };
                std::mem::swap(&mut self.start.x, &mut self.end.x);
                self.end.y = self.start.y;
            }
            Direction::ToRight | Direction::ToLeft => {
                self.start.x += if c.direction == Direction::ToRight {
                    step
                } else {
                    -step
                };
                self.end.x = self.start.x;
                std::mem::swap(&mut self.start.y, &mut self.end.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(direction: Direction) -> Coverage {
        Coverage {
            direction,
            width: 300.0,
            height: 120.0,
            size: 40.0,
            overlap: 10.0,
            padding: 30.0,
        }
    }

    #[test]
    fn test_pass_count() {
        // ceil((120 + 20 - 60) / 30) = ceil(2.67)
        assert_eq!(coverage(Direction::ToBottom).pass_count().unwrap(), 3);
        // ceil((300 + 20 - 60) / 30) = ceil(8.67)
        assert_eq!(coverage(Direction::ToRight).pass_count().unwrap(), 9);
    }

    #[test]
    fn test_to_bottom_alternates() {
        let plan = coverage(Direction::ToBottom).plan().unwrap();
        assert_eq!(plan.angle, FRAC_PI_2);
        assert_eq!(
            plan.passes,
            vec![
                Pass {
                    start: Point::new(30.0, 30.0),
                    end: Point::new(270.0, 30.0)
                },
                Pass {
                    start: Point::new(270.0, 60.0),
                    end: Point::new(30.0, 60.0)
                },
                Pass {
                    start: Point::new(30.0, 90.0),
                    end: Point::new(270.0, 90.0)
                },
            ]
        );
    }

    #[test]
    fn test_to_left_runs_right_to_left() {
        let plan = coverage(Direction::ToLeft).plan().unwrap();
        assert_eq!(plan.angle, 0.0);
        assert_eq!(plan.passes.len(), 9);
        assert_eq!(
            plan.passes[0],
            Pass {
                start: Point::new(270.0, 30.0),
                end: Point::new(270.0, 90.0)
            }
        );
        assert_eq!(
            plan.passes[1],
            Pass {
                start: Point::new(240.0, 90.0),
                end: Point::new(240.0, 30.0)
            }
        );
    }

    #[test]
    fn test_to_top_starts_at_the_bottom() {
        let plan = coverage(Direction::ToTop).plan().unwrap();
        assert_eq!(plan.passes[0].start, Point::new(30.0, 90.0));
        assert_eq!(plan.passes[2].end, Point::new(270.0, 30.0));
    }

    #[test]
    fn test_overflow_reduction_carries_into_next_pass() {
        let plan = coverage(Direction::ToBottom).plan_continuous(20.0).unwrap();
        // Pass 0 pulled back, pass 1 starts there and is pushed out
        assert_eq!(plan.passes[0].end, Point::new(250.0, 30.0));
        assert_eq!(plan.passes[1].start, Point::new(250.0, 60.0));
        assert_eq!(plan.passes[1].end, Point::new(50.0, 60.0));
        // Last pass (alt) pushed out from where pass 1 left the cursor
        assert_eq!(plan.passes[2].start, Point::new(50.0, 90.0));
        assert_eq!(plan.passes[2].end, Point::new(270.0, 90.0));
        assert_eq!(plan.control_points().len(), 12);
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        let mut c = coverage(Direction::ToBottom);
        c.overlap = 40.0;
        assert!(matches!(c.pass_count(), Err(StrokeError::InvalidInput(_))));
    }

    #[test]
    fn test_tiny_region_gets_one_pass() {
        let mut c = coverage(Direction::ToBottom);
        c.height = 10.0;
        assert_eq!(c.pass_count().unwrap(), 1);
    }
}
