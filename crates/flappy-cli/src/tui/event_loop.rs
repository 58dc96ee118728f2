use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Redraw at a fixed interval.
    Interval(Duration),
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
}

impl RenderMode {
    pub fn from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    fn as_interval(self) -> Option<Duration> {
        match self {
            RenderMode::Interval(interval) => Some(interval),
            RenderMode::OnDirty => None,
        }
    }
}

/// Produces tick, render and terminal events in time order.
///
/// Without a tick interval no tick events are generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: now,
            // first frame
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick or render is due, or a terminal event
    /// arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let do_render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self
            .render_mode
            .as_interval()
            .map(|interval| self.last_render + interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_from_rate() {
        let RenderMode::Interval(interval) = RenderMode::from_rate(50.0) else {
            panic!("expected an interval");
        };
        assert_eq!(interval, Duration::from_millis(20));
    }

    #[test]
    fn test_timeout_picks_the_earliest_deadline() {
        let mut events = EventLoop::default();
        assert_eq!(events.compute_timeout(events.last_tick), None);

        events.set_tick_interval(Some(Duration::from_millis(10)));
        events.set_render_mode(RenderMode::Interval(Duration::from_millis(40)));
        let now = events.last_tick;
        assert_eq!(events.compute_timeout(now), Some(Duration::from_millis(10)));

        events.set_tick_interval(None);
        assert_eq!(events.compute_timeout(now), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_first_event_is_tick_when_due() {
        let mut events = EventLoop::default();
        events.set_tick_interval(Some(Duration::ZERO));
        assert!(events.next().unwrap().is_tick());
    }
}
