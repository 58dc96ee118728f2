use flappy_engine::{Batch, Bird, Floor, Pipe, SpriteMasks};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Block, Widget},
};

use crate::ui::widgets::style;

/// Width in world pixels of each stripe painted on the floor tiles.
const FLOOR_STRIPE_WIDTH: f32 = 24.0;

/// Draws the world of a batch scaled to fit the widget area.
///
/// Each terminal cell shows whatever covers the world point at its center:
/// an opaque bird pixel, then a pipe, then the floor, otherwise sky. The floor
/// is striped relative to its tile offsets, so it visibly scrolls.
#[derive(Debug)]
pub struct WorldDisplay<'a, C> {
    batch: &'a Batch<C>,
    block: Option<Block<'a>>,
}

impl<'a, C> WorldDisplay<'a, C> {
    pub fn new(batch: &'a Batch<C>) -> Self {
        Self { batch, block: None }
    }

    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn cell_style(&self, x: f32, y: f32) -> Style {
        let masks = self.batch.masks();
        if self.batch.birds().any(|bird| bird_covers(bird, masks, x, y)) {
            return style::BIRD;
        }
        let target = self.batch.target_pipe_index();
        for (i, pipe) in self.batch.pipes().iter().enumerate() {
            if pipe_covers(pipe, x, y) {
                return if i == target {
                    style::TARGET_PIPE
                } else {
                    style::PIPE
                };
            }
        }
        let floor = self.batch.floor();
        if y >= floor.y() as f32 {
            return floor_style(floor, x);
        }
        style::SKY
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn bird_covers(bird: &Bird, masks: &SpriteMasks, x: f32, y: f32) -> bool {
    let mask = bird.mask(masks);
    let dx = (x - bird.x() as f32).floor();
    let dy = (y - bird.y().round_ties_even()).floor();
    if dx < 0.0 || dy < 0.0 {
        return false;
    }
    let (dx, dy) = (dx as usize, dy as usize);
    dx < mask.width() && dy < mask.height() && mask.get(dx, dy)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn floor_style(floor: &Floor, x: f32) -> Style {
    let (x1, x2) = floor.offsets();
    let (x1, x2) = (x1 as f32, x2 as f32);
    let tile = x1..x1 + floor.tile_width() as f32;
    let origin = if tile.contains(&x) { x1 } else { x2 };
    let stripe = ((x - origin) / FLOOR_STRIPE_WIDTH).floor() as i64;
    if stripe.rem_euclid(2) == 0 {
        style::FLOOR
    } else {
        style::FLOOR_STRIPE
    }
}

#[expect(clippy::cast_precision_loss)]
fn pipe_covers(pipe: &Pipe, x: f32, y: f32) -> bool {
    let in_column = (pipe.x() as f32..pipe.trailing_edge() as f32).contains(&x);
    in_column && (y < pipe.top_edge() as f32 || y >= pipe.bottom_edge() as f32)
}

impl<C> Widget for WorldDisplay<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl<C> Widget for &WorldDisplay<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.is_empty() {
            return;
        }

        let screen = &self.batch.config().screen;
        #[expect(clippy::cast_precision_loss)]
        let (world_width, world_height) = (screen.width as f32, screen.height as f32);
        let scale_x = world_width / f32::from(inner.width);
        let scale_y = world_height / f32::from(inner.height);

        for row in 0..inner.height {
            let y = (f32::from(row) + 0.5) * scale_y;
            for col in 0..inner.width {
                let x = (f32::from(col) + 0.5) * scale_x;
                if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
                    cell.set_style(self.cell_style(x, y));
                    cell.set_symbol(" ");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flappy_engine::{FnController, WorldConfig, WorldSeed};
    use ratatui::style::Color;

    use super::*;

    fn glide(_: &[f32]) -> f32 {
        -1.0
    }

    fn batch() -> Batch<FnController<fn(&[f32]) -> f32>> {
        Batch::new(
            WorldConfig::default(),
            WorldSeed::from_u128(7),
            [FnController::new(glide as fn(&[f32]) -> f32)],
        )
        .unwrap()
    }

    fn draw<C>(batch: &Batch<C>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        WorldDisplay::new(batch).render(area, &mut buf);
        buf
    }

    fn render(width: u16, height: u16) -> Buffer {
        draw(&batch(), width, height)
    }

    fn row_colors(buf: &Buffer, row: u16) -> Vec<Color> {
        (0..buf.area.width).map(|col| buf[(col, row)].bg).collect()
    }

    #[test]
    fn test_draws_sky_floor_and_bird() {
        // one cell per 10x10 world pixels
        let buf = render(50, 80);
        assert_eq!(buf[(0, 0)].bg, style::SKY.bg.unwrap());
        assert_eq!(buf[(0, 75)].bg, style::FLOOR.bg.unwrap());
        // bird body around (260, 376)
        assert_eq!(buf[(26, 37)].bg, style::BIRD.bg.unwrap());
    }

    #[test]
    fn test_floor_stripes_follow_scroll() {
        let mut batch = batch();
        let before = row_colors(&draw(&batch, 50, 80), 75);
        // cells sample x = 5, 15, 25, ...; stripes switch every 24 pixels
        assert_eq!(&before[..5], &[
            style::FLOOR.bg.unwrap(),
            style::FLOOR.bg.unwrap(),
            style::FLOOR_STRIPE.bg.unwrap(),
            style::FLOOR_STRIPE.bg.unwrap(),
            style::FLOOR_STRIPE.bg.unwrap(),
        ]);

        batch.tick();
        assert_eq!(batch.floor().offsets().0, -5);
        let after = row_colors(&draw(&batch, 50, 80), 75);
        assert_ne!(before, after);
        // x = 45 now lies 50 pixels into the tile
        assert_eq!(after[4], style::FLOOR.bg.unwrap());
    }

    #[test]
    fn test_empty_area_is_ignored() {
        let buf = render(0, 0);
        assert!(buf.content.is_empty());
    }
}
