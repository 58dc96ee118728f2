use crate::OpacityMask;

/// Number of wing-beat animation frames of a bird.
pub const BIRD_FRAME_COUNT: usize = 3;

/// Precomputed opacity masks of every sprite that takes part in collisions.
///
/// The masks are generated procedurally from the configured sprite sizes, so the
/// collision geometry does not depend on any image asset:
///
/// - Bird frames: an elliptical body with a beak on the right and a wing whose
///   height changes per frame (up, level, down). Corners are transparent.
/// - Pipes: fully opaque rectangles. The top pipe is the bottom pipe flipped
///   vertically, matching how its sprite is drawn.
#[derive(Debug, Clone)]
pub struct SpriteMasks {
    bird_frames: [OpacityMask; BIRD_FRAME_COUNT],
    pipe_top: OpacityMask,
    pipe_bottom: OpacityMask,
}

impl SpriteMasks {
    #[must_use]
    pub fn new(bird_size: (u32, u32), pipe_size: (u32, u32)) -> Self {
        let bird_frames = [0, 1, 2].map(|frame| bird_mask(bird_size, frame));
        let pipe_bottom = OpacityMask::from_fn(
            pipe_size.0 as usize,
            pipe_size.1 as usize,
            |_, _| true,
        );
        let pipe_top = pipe_bottom.flipped_vertically();
        Self {
            bird_frames,
            pipe_top,
            pipe_bottom,
        }
    }

    /// Returns the mask of the given bird animation frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame >= BIRD_FRAME_COUNT`.
    #[must_use]
    pub fn bird_frame(&self, frame: usize) -> &OpacityMask {
        &self.bird_frames[frame]
    }

    #[must_use]
    pub fn pipe_top(&self) -> &OpacityMask {
        &self.pipe_top
    }

    #[must_use]
    pub fn pipe_bottom(&self) -> &OpacityMask {
        &self.pipe_bottom
    }
}

#[expect(clippy::cast_precision_loss)]
fn bird_mask((width, height): (u32, u32), frame: usize) -> OpacityMask {
    let (w, h) = (width as f32, height as f32);
    let wing_y = [0.3, 0.5, 0.7][frame] * h;

    let in_ellipse = |px: f32, py: f32, cx: f32, cy: f32, rx: f32, ry: f32| {
        let nx = (px - cx) / rx;
        let ny = (py - cy) / ry;
        nx * nx + ny * ny <= 1.0
    };

    OpacityMask::from_fn(width as usize, height as usize, |x, y| {
        // sample pixel centers
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let body = in_ellipse(px, py, 0.45 * w, 0.55 * h, 0.4 * w, 0.38 * h);
        // the wing tip sticks out past the body's left edge
        let wing = in_ellipse(px, py, 0.1 * w, wing_y, 0.12 * w, 0.12 * h);
        let beak = (0.8 * w..0.97 * w).contains(&px) && (0.45 * h..0.65 * h).contains(&py);
        body || wing || beak
    })
}
