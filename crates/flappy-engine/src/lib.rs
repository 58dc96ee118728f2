pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when an evaluation batch cannot be started.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum BatchError {
    #[display("invalid world configuration: {_0}")]
    Config(ConfigError),
    #[display("batch requires at least one controller")]
    NoEntrants,
    #[display(
        "controller for entrant {id} has shape {input_len}->{output_len}, expected {expected_inputs}->N (N >= 1)"
    )]
    ControllerShape {
        id: EntrantId,
        input_len: usize,
        output_len: usize,
        expected_inputs: usize,
    },
}

impl From<ConfigError> for BatchError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
