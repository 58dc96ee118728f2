use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flappy_engine::{WorldConfig, WorldSeed};

use self::{simulate::SimulateArg, train::TrainArg, watch::WatchArg};
use crate::util;

mod simulate;
mod train;
mod watch;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a network controller with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Run one headless batch and print its report as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Watch birds fly in the terminal
    Watch(#[clap(flatten)] WatchArg),
}

/// Options shared by every mode that builds a world.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WorldArg {
    /// World seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<WorldSeed>,
    /// JSON file overriding the default world configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

impl WorldArg {
    /// Loads the configuration and settles the seed, printing it so the run
    /// can be repeated.
    pub(crate) fn load(&self) -> anyhow::Result<(WorldConfig, WorldSeed)> {
        let config = util::load_world_config(self.config.as_deref())?;
        let seed = self.seed.unwrap_or_else(rand::random);
        eprintln!("World seed: {seed}");
        Ok((config, seed))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Watch(WatchArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Watch(arg) => watch::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    pub(super) fn parse(args: &[&str]) -> Result<CommandArgs, clap::Error> {
        CommandArgs::try_parse_from(std::iter::once("flappy").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_watch() {
        let args = parse(&[]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_simulate_needs_exactly_one_controller() {
        assert!(parse(&["simulate"]).is_err());
        assert!(parse(&["simulate", "--heuristic", "--model", "m.json"]).is_err());
        assert!(parse(&["simulate", "--heuristic"]).is_ok());
        assert!(parse(&["simulate", "--model", "m.json"]).is_ok());
    }
}
