//! Hand-written baseline controller.

use flappy_engine::{Controller, SENSOR_COUNT};

/// Keeps the bird in the upper part of the target gap.
///
/// The sensors only carry absolute distances, so the follower compares them:
/// `|y - top| - |y - bottom|` is `2 * (y - gap middle)` inside the gap and the
/// full gap height below it. The bird jumps once that difference exceeds
/// `margin`, i.e. when it has sunk `margin / 2` past the middle of the gap or
/// dropped below it entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapFollower {
    margin: f32,
}

impl Default for GapFollower {
    fn default() -> Self {
        Self { margin: 40.0 }
    }
}

impl GapFollower {
    #[must_use]
    pub const fn new(margin: f32) -> Self {
        Self { margin }
    }

    #[must_use]
    pub fn margin(&self) -> f32 {
        self.margin
    }
}

impl Controller for GapFollower {
    fn input_len(&self) -> usize {
        SENSOR_COUNT
    }

    fn output_len(&self) -> usize {
        1
    }

    fn activate(&self, inputs: &[f32], outputs: &mut [f32]) {
        let (to_top, to_bottom) = (inputs[1], inputs[2]);
        outputs[0] = if to_top - to_bottom > self.margin {
            1.0
        } else {
            -1.0
        };
    }
}
