use serde::Serialize;

use crate::{BIRD_FRAME_COUNT, BirdPhysics, OpacityMask, SpriteMasks};

/// Decision applied to a bird after it has been stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Action {
    Jump,
    Glide,
}

impl Action {
    /// Interprets the first controller output: strictly positive means jump.
    #[must_use]
    pub fn from_output(value: f32) -> Self {
        if value > 0.0 { Self::Jump } else { Self::Glide }
    }
}

/// Kinematic state of one bird.
///
/// Birds never move horizontally; the world scrolls past them. Vertical motion
/// follows a quadratic model restarted by every jump:
///
/// ```text
/// t = ticks since the last jump
/// d = min(v * t + g * t^2, terminal)   (g = 1.5, terminal = 16 by default)
/// d = d - rise_bias                    if d < 0
/// y = y + d
/// ```
///
/// Tilt and animation frame are cosmetic, except that the frame selects which
/// mask is used for collision tests.
#[derive(Debug, Clone, Serialize)]
pub struct Bird {
    x: i32,
    y: f32,
    velocity: f32,
    tick_count: u32,
    jump_origin: f32,
    displacement: f32,
    tilt: f32,
    animation_ticks: u32,
    frame: usize,
}

impl Bird {
    #[must_use]
    pub fn new(x: i32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            jump_origin: y,
            displacement: 0.0,
            tilt: 0.0,
            animation_ticks: 0,
            frame: 0,
        }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Velocity set by the last jump (0 before the first one).
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Vertical displacement applied by the last [`step`](Self::step).
    #[must_use]
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// Ticks since the last jump.
    #[must_use]
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Height the bird was at when it last jumped.
    #[must_use]
    pub fn jump_origin(&self) -> f32 {
        self.jump_origin
    }

    /// Tilt in degrees, positive is nose up.
    #[must_use]
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Index of the current animation frame.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Returns the collision mask of the current animation frame.
    #[must_use]
    pub fn mask<'a>(&self, masks: &'a SpriteMasks) -> &'a OpacityMask {
        masks.bird_frame(self.frame)
    }

    /// Advances the bird by one tick.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn step(&mut self, physics: &BirdPhysics) {
        self.tick_count = self.tick_count.saturating_add(1);
        let t = self.tick_count as f32;

        let mut d = (self.velocity * t + physics.gravity * t * t).min(physics.terminal_displacement);
        if d < 0.0 {
            d -= physics.rise_bias;
        }
        self.y += d;
        self.displacement = d;

        if d < 0.0 || self.y < self.jump_origin + physics.tilt_band {
            self.tilt = self.tilt.clamp(physics.max_down_rotation, physics.max_rotation);
        } else if self.tilt > physics.max_down_rotation {
            self.tilt = (self.tilt - physics.rotation_velocity).max(physics.max_down_rotation);
        }

        let cycle = physics.animation_time * BIRD_FRAME_COUNT as u32;
        self.animation_ticks = (self.animation_ticks + 1) % cycle;
        self.update_frame(physics);
    }

    /// Restarts the physics clock with an upward impulse.
    pub fn jump(&mut self, physics: &BirdPhysics) {
        self.velocity = physics.jump_velocity;
        self.tick_count = 0;
        self.jump_origin = self.y;
        self.tilt = physics.max_rotation;
        self.update_frame(physics);
    }

    pub fn apply_action(&mut self, action: Action, physics: &BirdPhysics) {
        match action {
            Action::Jump => self.jump(physics),
            Action::Glide => {}
        }
    }

    fn update_frame(&mut self, physics: &BirdPhysics) {
        self.frame = if self.tilt <= physics.nose_dive_tilt {
            // wings held still while diving
            0
        } else {
            (self.animation_ticks / physics.animation_time) as usize
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> BirdPhysics {
        BirdPhysics::default()
    }

    #[test]
    fn test_free_fall_converges_to_terminal_displacement() {
        let physics = physics();
        let mut bird = Bird::new(230, 350.0);
        let mut displacements = vec![];
        for _ in 0..100 {
            let y = bird.y();
            bird.step(&physics);
            assert!(bird.y() > y, "bird must keep falling");
            displacements.push(bird.displacement());
        }

        assert_eq!(&displacements[..4], &[1.5, 6.0, 13.5, 16.0]);
        assert!(displacements.is_sorted());
        assert!(displacements[4..].iter().all(|&d| d == 16.0));
        assert_eq!(bird.y(), 387.0 + 16.0 * 96.0);
        assert_eq!(bird.x(), 230);
    }

    #[test]
    fn test_jump_resets_state() {
        let physics = physics();
        let mut bird = Bird::new(230, 350.0);
        for _ in 0..10 {
            bird.step(&physics);
        }
        let y = bird.y();

        bird.apply_action(Action::Jump, &physics);
        assert_eq!(bird.velocity(), -10.5);
        assert_eq!(bird.tilt(), 25.0);
        assert_eq!(bird.tick_count(), 0);
        assert_eq!(bird.jump_origin(), y);

        // d = -10.5 + 1.5 = -9, then the rise bias of 2
        bird.step(&physics);
        assert_eq!(bird.displacement(), -11.0);
        assert_eq!(bird.y(), y - 11.0);
    }

    #[test]
    fn test_glide_keeps_state() {
        let physics = physics();
        let mut bird = Bird::new(230, 350.0);
        bird.step(&physics);
        let before = bird.clone();
        bird.apply_action(Action::Glide, &physics);
        assert_eq!(bird.velocity(), before.velocity());
        assert_eq!(bird.tick_count(), before.tick_count());
        assert_eq!(bird.tilt(), before.tilt());
    }

    #[test]
    fn test_tilt_dives_after_leaving_band() {
        let physics = physics();
        let mut bird = Bird::new(230, 350.0);
        let mut tilts = vec![];
        for _ in 0..12 {
            bird.step(&physics);
            tilts.push(bird.tilt());
        }
        // y: 351.5, 357.5, 371, 387, 403, ... band ends at 400
        assert_eq!(&tilts[..4], &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(&tilts[4..], &[-20.0, -40.0, -60.0, -80.0, -90.0, -90.0, -90.0, -90.0]);
        assert!(tilts.iter().all(|t| (-90.0..=25.0).contains(t)));
    }

    #[test]
    fn test_tilt_in_band_keeps_current_angle() {
        let physics = physics();

        // falling from rest never tilts up
        let mut bird = Bird::new(230, 350.0);
        bird.step(&physics);
        assert_eq!(bird.displacement(), 1.5);
        assert_eq!(bird.tilt(), 0.0);

        // a flap holds the nose up while rising
        bird.jump(&physics);
        for _ in 0..3 {
            bird.step(&physics);
            assert!(bird.displacement() < 0.0);
            assert_eq!(bird.tilt(), 25.0);
        }
    }

    #[test]
    fn test_animation_cycles_and_freezes_in_dive() {
        let physics = physics();
        let mut bird = Bird::new(230, 0.0);
        let mut frames = vec![];
        for _ in 0..21 {
            // keep the bird in the tilt band so the wings keep beating
            bird.jump(&physics);
            bird.step(&physics);
            frames.push(bird.frame());
        }
        let expected: Vec<usize> = [vec![0; 6], vec![1; 7], vec![2; 7], vec![0]].concat();
        assert_eq!(frames, expected);

        let mut bird = Bird::new(230, 0.0);
        for _ in 0..30 {
            bird.step(&physics);
        }
        assert_eq!(bird.tilt(), -90.0);
        assert_eq!(bird.frame(), 0);
    }

    #[test]
    fn test_action_from_output() {
        assert!(Action::from_output(0.01).is_jump());
        assert!(Action::from_output(0.0).is_glide());
        assert!(Action::from_output(-3.0).is_glide());
    }
}
