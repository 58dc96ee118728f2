use serde::Serialize;

/// Two tiled copies of the floor strip scrolling left in lockstep.
///
/// When a tile has scrolled fully past the left edge it is moved to follow the
/// other tile, so the strip appears infinite.
#[derive(Debug, Clone, Serialize)]
pub struct Floor {
    y: i32,
    width: i32,
    x1: i32,
    x2: i32,
}

impl Floor {
    #[must_use]
    pub fn new(y: i32, width: i32) -> Self {
        Self {
            y,
            width,
            x1: 0,
            x2: width,
        }
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn tile_width(&self) -> i32 {
        self.width
    }

    /// Left edges of both tiles.
    #[must_use]
    pub fn offsets(&self) -> (i32, i32) {
        (self.x1, self.x2)
    }

    pub fn step(&mut self, velocity: i32) {
        self.x1 -= velocity;
        self.x2 -= velocity;
        if self.x1 + self.width < 0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0 {
            self.x2 = self.x1 + self.width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_stay_adjacent() {
        let mut floor = Floor::new(700, 672);
        for _ in 0..10_000 {
            floor.step(5);
            let (x1, x2) = floor.offsets();
            assert_eq!((x1 - x2).abs(), 672, "tiles drifted apart: {x1}, {x2}");
            // together they always cover the left screen edge
            assert!(x1.min(x2) <= 0);
            assert!(x1.min(x2) + 672 >= -5);
        }
    }

    #[test]
    fn test_wrap_moves_tile_behind_the_other() {
        let mut floor = Floor::new(700, 10);
        floor.step(5);
        floor.step(5);
        assert_eq!(floor.offsets(), (-10, 0));
        floor.step(5);
        // x1 + width = -5 < 0, wraps behind x2 = -5
        assert_eq!(floor.offsets(), (5, -5));
    }
}
