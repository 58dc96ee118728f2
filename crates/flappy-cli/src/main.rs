use std::io;

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod command;
mod model;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    command::run()
}
