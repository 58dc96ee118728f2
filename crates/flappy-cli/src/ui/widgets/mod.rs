use ratatui::{layout::Rect, widgets::Block};

pub use self::{stats_display::*, world_display::*};

mod stats_display;
mod world_display;

mod color {
    use ratatui::style::Color;

    pub const SKY: Color = Color::Rgb(78, 192, 202);
    pub const PIPE: Color = Color::Rgb(84, 170, 58);
    pub const TARGET_PIPE: Color = Color::Rgb(116, 214, 82);
    pub const FLOOR: Color = Color::Rgb(222, 216, 149);
    pub const FLOOR_STRIPE: Color = Color::Rgb(200, 190, 120);
    pub const BIRD: Color = Color::Rgb(250, 204, 36);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const LABEL: Style = fg_bg(color::GRAY, color::BLACK);
    pub const SKY: Style = bg_only(color::SKY);
    pub const PIPE: Style = bg_only(color::PIPE);
    pub const TARGET_PIPE: Style = bg_only(color::TARGET_PIPE);
    pub const FLOOR: Style = bg_only(color::FLOOR);
    pub const FLOOR_STRIPE: Style = bg_only(color::FLOOR_STRIPE);
    pub const BIRD: Style = bg_only(color::BIRD);
}

/// Border color for the current run state.
pub fn border_color(paused: bool, turbo: bool) -> ratatui::style::Color {
    if paused {
        color::YELLOW
    } else if turbo {
        color::MAGENTA
    } else {
        color::WHITE
    }
}

fn block_vertical_margin(block: Option<&Block>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&Block>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
