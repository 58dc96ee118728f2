use serde::{Deserialize, Serialize};

/// Immutable parameter bundle for one batch.
///
/// Every field has a default matching the classic game, so a JSON override only
/// needs the values it changes:
///
/// ```
/// use flappy_engine::WorldConfig;
///
/// let config: WorldConfig = serde_json::from_str(r#"{ "pipe": { "gap": 250 } }"#).unwrap();
/// assert_eq!(config.pipe.gap, 250);
/// assert_eq!(config.pipe.width, 104);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub screen: ScreenConfig,
    pub bird: BirdConfig,
    pub pipe: PipeGeometry,
    pub floor: FloorConfig,
    /// Horizontal distance pipes and floor move left per tick.
    pub scroll_velocity: i32,
    pub fitness: FitnessRewards,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            bird: BirdConfig::default(),
            pipe: PipeGeometry::default(),
            floor: FloorConfig::default(),
            scroll_velocity: 5,
            fitness: FitnessRewards::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    /// A bird whose bottom edge reaches this line dies.
    pub floor_line: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 800,
            floor_line: 730.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BirdConfig {
    pub spawn_x: i32,
    pub spawn_y: f32,
    pub width: u32,
    pub height: u32,
    pub physics: BirdPhysics,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            spawn_x: 230,
            spawn_y: 350.0,
            width: 68,
            height: 48,
            physics: BirdPhysics::default(),
        }
    }
}

/// Constants of the bird's motion model. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BirdPhysics {
    /// Velocity set by a jump (negative is up).
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Upper bound of the per-tick displacement (fastest fall).
    pub terminal_displacement: f32,
    /// Extra upward displacement applied while rising.
    pub rise_bias: f32,
    pub max_rotation: f32,
    pub max_down_rotation: f32,
    pub rotation_velocity: f32,
    /// Height below the jump origin where the bird keeps its nose up.
    pub tilt_band: f32,
    /// Ticks per animation frame.
    pub animation_time: u32,
    /// At or below this tilt the wings stop beating.
    pub nose_dive_tilt: f32,
}

impl Default for BirdPhysics {
    fn default() -> Self {
        Self {
            jump_velocity: -10.5,
            gravity: 1.5,
            terminal_displacement: 16.0,
            rise_bias: 2.0,
            max_rotation: 25.0,
            max_down_rotation: -90.0,
            rotation_velocity: 20.0,
            tilt_band: 50.0,
            animation_time: 7,
            nose_dive_tilt: -80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipeGeometry {
    /// Sprite width of one pipe.
    pub width: u32,
    /// Sprite height of one pipe.
    pub height: u32,
    /// Vertical size of the gap.
    pub gap: i32,
    /// Smallest gap center (inclusive).
    pub gap_center_min: i32,
    /// Largest gap center (exclusive).
    pub gap_center_max: i32,
    /// Horizontal position new pipes appear at.
    pub spawn_x: i32,
}

impl Default for PipeGeometry {
    fn default() -> Self {
        Self {
            width: 104,
            height: 640,
            gap: 200,
            gap_center_min: 50,
            gap_center_max: 450,
            spawn_x: 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorConfig {
    pub y: i32,
    pub tile_width: i32,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            y: 700,
            tile_width: 672,
        }
    }
}

/// Fitness shaping applied by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitnessRewards {
    /// Added to every live bird each tick.
    pub survival_bonus: f32,
    /// Subtracted from a bird that hits a pipe.
    pub collision_penalty: f32,
    /// Added to every live bird when any bird passes a pipe.
    pub pass_bonus: f32,
}

impl Default for FitnessRewards {
    fn default() -> Self {
        Self {
            survival_bonus: 0.1,
            collision_penalty: 1.0,
            pass_bonus: 5.0,
        }
    }
}

/// Reason a [`WorldConfig`] was rejected.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[display("gap center range {min}..{max} is empty")]
    EmptyGapRange { min: i32, max: i32 },
    #[display("bird spawn point ({x}, {y}) is outside the {width}x{floor_line} play area")]
    SpawnOutOfBounds {
        x: i32,
        y: f32,
        width: u32,
        floor_line: f32,
    },
    #[display("pipe spawn x {pipe_x} must be right of the bird spawn x {bird_x}")]
    PipeSpawnBehindBird { pipe_x: i32, bird_x: i32 },
}

impl WorldConfig {
    /// Checks the bundle for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check()
            .inspect_err(|err| tracing::warn!(%err, "rejected world configuration"))
    }

    #[expect(clippy::cast_precision_loss)]
    fn check(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen.width", f64::from(self.screen.width)),
            ("screen.height", f64::from(self.screen.height)),
            ("screen.floor_line", f64::from(self.screen.floor_line)),
            ("bird.width", f64::from(self.bird.width)),
            ("bird.height", f64::from(self.bird.height)),
            (
                "bird.physics.animation_time",
                f64::from(self.bird.physics.animation_time),
            ),
            (
                "bird.physics.terminal_displacement",
                f64::from(self.bird.physics.terminal_displacement),
            ),
            ("pipe.width", f64::from(self.pipe.width)),
            ("pipe.height", f64::from(self.pipe.height)),
            ("pipe.gap", f64::from(self.pipe.gap)),
            ("floor.tile_width", f64::from(self.floor.tile_width)),
            ("scroll_velocity", f64::from(self.scroll_velocity)),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let pipe = &self.pipe;
        if pipe.gap_center_min >= pipe.gap_center_max {
            return Err(ConfigError::EmptyGapRange {
                min: pipe.gap_center_min,
                max: pipe.gap_center_max,
            });
        }

        let bird = &self.bird;
        let x_in_screen = u32::try_from(bird.spawn_x).is_ok_and(|x| x < self.screen.width);
        let y_in_screen =
            (0.0..self.screen.floor_line - bird.height as f32).contains(&bird.spawn_y);
        if !x_in_screen || !y_in_screen {
            return Err(ConfigError::SpawnOutOfBounds {
                x: bird.spawn_x,
                y: bird.spawn_y,
                width: self.screen.width,
                floor_line: self.screen.floor_line,
            });
        }

        if pipe.spawn_x <= bird.spawn_x {
            return Err(ConfigError::PipeSpawnBehindBird {
                pipe_x: pipe.spawn_x,
                bird_x: bird.spawn_x,
            });
        }

        Ok(())
    }
}
