use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Simulation update timing.
    Tick,
    /// Screen render timing.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
