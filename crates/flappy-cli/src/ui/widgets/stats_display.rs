use flappy_engine::Batch;
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Buffer, Rect},
    text::Line,
    widgets::{Block, Widget},
};

use crate::ui::widgets::style;

/// Label/value table with the live counters of a batch.
///
/// Callers can append rows of their own (generation, seed, ...) after the
/// batch counters.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    rows: Vec<(&'static str, String)>,
    block: Option<Block<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new<C>(batch: &Batch<C>) -> Self {
        let best = batch
            .entrants()
            .map(|entrant| entrant.fitness)
            .max_by(f32::total_cmp);
        let rows = vec![
            ("SCORE", batch.score().to_string()),
            (
                "ALIVE",
                format!("{}/{}", batch.alive(), batch.entrant_count()),
            ),
            ("TICKS", batch.ticks().to_string()),
            (
                "BEST",
                best.map_or_else(|| "-".to_owned(), |f| format!("{f:.1}")),
            ),
        ];
        Self { rows, block: None }
    }

    pub fn row(mut self, label: &'static str, value: impl ToString) -> Self {
        self.rows.push((label, value.to_string()));
        self
    }

    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn label_width(&self) -> u16 {
        let width = self.rows.iter().map(|(label, _)| label.len()).max();
        u16::try_from(width.unwrap_or(0)).unwrap_or(u16::MAX)
    }

    fn value_width(&self) -> u16 {
        let width = self.rows.iter().map(|(_, value)| value.len()).max();
        u16::try_from(width.unwrap_or(0)).unwrap_or(u16::MAX)
    }

    pub fn width(&self) -> u16 {
        let margin = super::block_horizontal_margin(self.block.as_ref());
        self.label_width()
            .saturating_add(1)
            .saturating_add(self.value_width())
            .saturating_add(margin)
    }

    pub fn height(&self) -> u16 {
        let margin = super::block_vertical_margin(self.block.as_ref());
        u16::try_from(self.rows.len())
            .unwrap_or(u16::MAX)
            .saturating_add(margin)
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
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

        let [label_area, value_area] = Layout::horizontal([
            Constraint::Length(self.label_width()),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(inner);

        for (i, (label, value)) in self.rows.iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else {
                break;
            };
            if offset >= inner.height {
                break;
            }
            let label_row = Rect {
                y: label_area.y + offset,
                height: 1,
                ..label_area
            };
            let value_row = Rect {
                y: value_area.y + offset,
                height: 1,
                ..value_area
            };
            Line::styled(*label, style::LABEL).render(label_row, buf);
            Line::styled(value.as_str(), style::DEFAULT)
                .right_aligned()
                .render(value_row, buf);
        }
    }
}
