use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// Application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the event loop starts. Configure tick and render
    /// rates here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Advances the application state (called on each tick event).
    fn update(&mut self, runtime: &mut Runtime);
}
