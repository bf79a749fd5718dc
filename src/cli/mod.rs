//! Command-line interface wiring for epi-assoc.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::{config::Settings, measures::RatioKind};

pub mod measure;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Measures of association for case/control tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::OddsRatio(args) => measure::run(RatioKind::OddsRatio, args, &settings),
            Commands::RelativeRisk(args) => measure::run(RatioKind::RelRisk, args, &settings),
            Commands::Measure(args) => measure::run(args.kind, args.common, &settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Odds ratios with Woolf or Gart confidence intervals.
    OddsRatio(measure::Args),
    /// Risk ratios with Katz or adjusted-log confidence intervals.
    RelativeRisk(measure::Args),
    /// Either ratio, chosen with `--kind oddsratio|relrisk`.
    Measure(measure::KindArgs),
}

/// Rendering of the result table.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// Comma separated values.
    Csv,
    /// JSON document with both formatted and raw limits.
    Json,
}
