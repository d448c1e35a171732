//! Containment walls around the viewport.
//!
//! Four static boxes sit just outside the visible edges. The horizontal ones
//! overhang by one thickness on each side so the corners are closed.

use crate::config::Viewport;
use bubble_shared::vec2::{vec2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axis-aligned static box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub side: WallSide,
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Wall {
    pub fn min(&self) -> Vec2 {
        vec2(
            self.center.x - self.half_extents.x,
            self.center.y - self.half_extents.y,
        )
    }

    pub fn max(&self) -> Vec2 {
        vec2(
            self.center.x + self.half_extents.x,
            self.center.y + self.half_extents.y,
        )
    }

    pub fn width(&self) -> f64 {
        self.half_extents.x * 2.0
    }

    pub fn height(&self) -> f64 {
        self.half_extents.y * 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Walls {
    walls: [Wall; 4],
    thickness: f64,
}

impl Walls {
    pub fn new(viewport: Viewport, thickness: f64) -> Self {
        Self {
            walls: layout(viewport, thickness),
            thickness,
        }
    }

    /// Move the walls to the edges of `viewport`. Only the walls change.
    pub fn reposition(&mut self, viewport: Viewport) {
        self.walls = layout(viewport, self.thickness);
    }

    pub fn get(&self, side: WallSide) -> &Wall {
        match side {
            WallSide::Top => &self.walls[0],
            WallSide::Bottom => &self.walls[1],
            WallSide::Left => &self.walls[2],
            WallSide::Right => &self.walls[3],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter()
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }
}

fn layout(viewport: Viewport, t: f64) -> [Wall; 4] {
    let Viewport { width: w, height: h } = viewport;
    let half_t = t / 2.0;
    [
        Wall {
            side: WallSide::Top,
            center: vec2(w / 2.0, -half_t),
            half_extents: vec2(w / 2.0 + t, half_t),
        },
        Wall {
            side: WallSide::Bottom,
            center: vec2(w / 2.0, h + half_t),
            half_extents: vec2(w / 2.0 + t, half_t),
        },
        Wall {
            side: WallSide::Left,
            center: vec2(-half_t, h / 2.0),
            half_extents: vec2(half_t, h / 2.0 + t),
        },
        Wall {
            side: WallSide::Right,
            center: vec2(w + half_t, h / 2.0),
            half_extents: vec2(half_t, h / 2.0 + t),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_flush(walls: &Walls, w: f64, h: f64) {
        assert!((walls.get(WallSide::Top).max().y - 0.0).abs() < EPS);
        assert!((walls.get(WallSide::Bottom).min().y - h).abs() < EPS);
        assert!((walls.get(WallSide::Left).max().x - 0.0).abs() < EPS);
        assert!((walls.get(WallSide::Right).min().x - w).abs() < EPS);
    }

    #[test]
    fn walls_sit_just_outside_viewport() {
        let walls = Walls::new(Viewport::new(800.0, 600.0), 100.0);
        assert_flush(&walls, 800.0, 600.0);
        assert!((walls.get(WallSide::Top).width() - 1000.0).abs() < EPS);
        assert!((walls.get(WallSide::Left).height() - 800.0).abs() < EPS);
        assert!((walls.get(WallSide::Right).width() - 100.0).abs() < EPS);
    }

    #[test]
    fn reposition_follows_new_edges() {
        let mut walls = Walls::new(Viewport::new(800.0, 600.0), 100.0);
        walls.reposition(Viewport::new(1920.0, 1080.0));
        assert_flush(&walls, 1920.0, 1080.0);
        assert!((walls.get(WallSide::Bottom).width() - 2120.0).abs() < EPS);
        assert!((walls.thickness() - 100.0).abs() < EPS);
    }

    #[test]
    fn corners_are_closed() {
        let walls = Walls::new(Viewport::new(400.0, 300.0), 80.0);
        let top = walls.get(WallSide::Top);
        let left = walls.get(WallSide::Left);
        // The top wall reaches past the left wall's outer face.
        assert!(top.min().x <= left.min().x);
        assert!(left.min().y <= top.min().y);
    }
}
