use rand::Rng;
use serde::Serialize;

use crate::{Bird, PipeGeometry, SpriteMasks};

/// A scrolling pair of pipes with a gap between them.
///
/// The gap center is drawn once at creation and never changes. Drawing and
/// collision use the same derived edges:
///
/// ```text
///   x
///   |######|  top pipe, sprite spans [top_sprite_y, gap_center)
///   |######|
///   +------+  <- top_edge()    = gap_center
///
///     gap         (gap height)
///
///   +------+  <- bottom_edge() = gap_center + gap
///   |######|  bottom pipe
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Pipe {
    x: i32,
    gap_center: i32,
    top: i32,
    bottom: i32,
    width: i32,
    passed: bool,
}

impl Pipe {
    /// Creates a pipe at `x` with a gap center drawn uniformly from the configured range.
    pub fn new<R>(x: i32, geometry: &PipeGeometry, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let gap_center = rng.random_range(geometry.gap_center_min..geometry.gap_center_max);
        Self::with_gap_center(x, gap_center, geometry)
    }

    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn with_gap_center(x: i32, gap_center: i32, geometry: &PipeGeometry) -> Self {
        Self {
            x,
            gap_center,
            top: gap_center - geometry.height as i32,
            bottom: gap_center + geometry.gap,
            width: geometry.width as i32,
            passed: false,
        }
    }

    /// Left edge of both pipes.
    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Right edge of both pipes.
    #[must_use]
    pub fn trailing_edge(&self) -> i32 {
        self.x + self.width
    }

    #[must_use]
    pub fn gap_center(&self) -> i32 {
        self.gap_center
    }

    /// Bottom edge of the top pipe (upper bound of the gap).
    #[must_use]
    pub fn top_edge(&self) -> i32 {
        self.gap_center
    }

    /// Top edge of the bottom pipe (lower bound of the gap).
    #[must_use]
    pub fn bottom_edge(&self) -> i32 {
        self.bottom
    }

    /// Y coordinate where the top pipe's sprite starts.
    #[must_use]
    pub fn top_sprite_y(&self) -> i32 {
        self.top
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn mark_passed(&mut self) {
        self.passed = true;
    }

    pub fn step(&mut self, velocity: i32) {
        self.x -= velocity;
    }

    /// Returns whether the pipe has scrolled fully past the left screen edge.
    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0
    }

    /// Pixel-exact collision test against both pipes.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn collides_with(&self, bird: &Bird, masks: &SpriteMasks) -> bool {
        let bird_mask = bird.mask(masks);
        let bird_y = bird.y().round_ties_even() as i32;
        let dx = self.x - bird.x();
        let top_offset = (dx, self.top - bird_y);
        let bottom_offset = (dx, self.bottom - bird_y);

        bird_mask.overlaps(masks.pipe_bottom(), bottom_offset)
            || bird_mask.overlaps(masks.pipe_top(), top_offset)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn geometry() -> PipeGeometry {
        PipeGeometry::default()
    }

    fn masks() -> SpriteMasks {
        SpriteMasks::new((68, 48), (104, 640))
    }

    #[test]
    fn test_gap_edges_derive_from_center() {
        let pipe = Pipe::with_gap_center(700, 300, &geometry());
        assert_eq!(pipe.top_edge(), 300);
        assert_eq!(pipe.bottom_edge(), 500);
        assert_eq!(pipe.top_sprite_y(), 300 - 640);
        assert_eq!(pipe.trailing_edge(), 804);
        assert!(!pipe.is_passed());
    }

    #[test]
    fn test_random_gap_center_in_range() {
        let geometry = geometry();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let pipe = Pipe::new(700, &geometry, &mut rng);
            assert!((50..450).contains(&pipe.gap_center()));
            assert_eq!(pipe.bottom_edge() - pipe.top_edge(), 200);
        }
    }

    #[test]
    fn test_step_and_off_screen() {
        let mut pipe = Pipe::with_gap_center(0, 300, &geometry());
        for _ in 0..20 {
            pipe.step(5);
        }
        assert_eq!(pipe.x(), -100);
        assert!(!pipe.is_off_screen());
        pipe.step(5);
        assert_eq!(pipe.trailing_edge(), -1);
        assert!(pipe.is_off_screen());
    }

    #[test]
    fn test_bird_inside_gap_does_not_collide() {
        let masks = masks();
        let pipe = Pipe::with_gap_center(230, 300, &geometry());
        let bird = Bird::new(230, 350.0);
        assert!(!pipe.collides_with(&bird, &masks));
    }

    #[test]
    fn test_bird_hits_bottom_pipe() {
        let masks = masks();
        // bottom pipe starts 40 rows below the bird's top row, through its body
        let pipe = Pipe::with_gap_center(230, 350 + 40 - 200, &geometry());
        let bird = Bird::new(230, 350.0);
        assert!(pipe.collides_with(&bird, &masks));
    }

    #[test]
    fn test_bird_hits_top_pipe() {
        let masks = masks();
        // top pipe ends 27 rows below the bird's top row
        let pipe = Pipe::with_gap_center(230, 350 + 27, &geometry());
        let bird = Bird::new(230, 350.0);
        assert!(pipe.collides_with(&bird, &masks));
    }

    #[test]
    fn test_bounding_box_overlap_is_not_a_collision() {
        let masks = masks();
        let bird = Bird::new(230, 350.0);
        // the pipes' boxes touch only the bird's transparent bottom-right corner pixel
        let pipe = Pipe::with_gap_center(230 + 67, 350 + 47 - 200, &geometry());
        assert!(!pipe.collides_with(&bird, &masks));

        // moving the pipe into the body makes the masks overlap
        let pipe = Pipe::with_gap_center(230 + 30, 350 + 40 - 200, &geometry());
        assert!(pipe.collides_with(&bird, &masks));
    }

    #[test]
    fn test_collision_uses_rounded_height() {
        let masks = masks();
        let pipe = Pipe::with_gap_center(230, 300, &geometry());
        // 300 - 0.4 rounds to 300: the top pipe ends exactly at the bird's top row
        let bird = Bird::new(230, 299.6);
        assert!(!pipe.collides_with(&bird, &masks));
    }

    #[test]
    fn test_collision_rounds_half_to_even() {
        let masks = masks();
        let bird = Bird::new(230, 350.0);
        let mask = bird.mask(&masks);
        let top_row = (0..mask.height())
            .find(|&y| (0..mask.width()).any(|x| mask.get(x, y)))
            .unwrap();
        let top_row = i32::try_from(top_row).unwrap();

        // the top pipe covers the bird's top row only while y stays at 350
        let pipe = Pipe::with_gap_center(230, 350 + top_row + 1, &geometry());
        assert!(pipe.collides_with(&bird, &masks));
        assert!(pipe.collides_with(&Bird::new(230, 350.5), &masks));
        assert!(!pipe.collides_with(&Bird::new(230, 351.0), &masks));

        // 351.5 rounds up to 352, away from the pipe edge at 351
        let pipe = Pipe::with_gap_center(230, 351 + top_row + 1, &geometry());
        assert!(pipe.collides_with(&Bird::new(230, 351.0), &masks));
        assert!(!pipe.collides_with(&Bird::new(230, 351.5), &masks));
    }
}
