//! CLI entry-point for odds ratio and risk ratio tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use polars::prelude::DataFrame;
use tracing::{info, instrument};

use super::OutputFormat;
use crate::{
    config::{self, Settings},
    data::ingest,
    measures::{self, AssociationTable, Level, Missing, Options, RatioKind},
};

/// Args shared by the `odds-ratio` and `relative-risk` sub-commands.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Delimited input file with a header row.
    #[arg(long)]
    pub input: PathBuf,
    /// Outcome column.
    #[arg(long)]
    pub outcome: String,
    /// Outcome value marking a case.
    #[arg(long)]
    pub case: String,
    /// Risk-factor column.
    #[arg(long)]
    pub factor: String,
    /// Risk-factor level used as the reference stratum.
    #[arg(long)]
    pub base: String,
    /// Extra value treated as missing (blanks and NaN always are).
    #[arg(long)]
    pub missing: Option<String>,
    /// Significance level; defaults to ASSOC_ALPHA or 0.05.
    #[arg(long)]
    pub alpha: Option<f64>,
    /// Field delimiter; defaults to ASSOC_DELIMITER or ','.
    #[arg(long)]
    pub delimiter: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Write the result here instead of stdout; relative paths land under OUTPUTS_DIR.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Args for the `measure` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct KindArgs {
    /// Ratio to compute: `oddsratio` or `relrisk`.
    #[arg(long)]
    pub kind: RatioKind,
    #[command(flatten)]
    pub common: Args,
}

#[instrument(skip(settings))]
pub fn run(kind: RatioKind, args: Args, settings: &Settings) -> Result<()> {
    let delimiter = match &args.delimiter {
        Some(raw) => config::parse_delimiter(raw)?,
        None => settings.delimiter,
    };
    let sentinel = args.missing.as_deref().or(settings.missing.as_deref());
    let null_values: Vec<&str> = sentinel.into_iter().collect();
    let df = ingest::read_csv(&args.input, delimiter, &null_values)?;

    let options = Options::default()
        .with_alpha(args.alpha.unwrap_or(settings.alpha))
        .with_missing(Missing::from_sentinel(sentinel));
    let table = measures::measure(
        &df,
        kind,
        &args.outcome,
        &typed_value(&df, &args.outcome, &args.case),
        &args.factor,
        &typed_value(&df, &args.factor, &args.base),
        &options,
    )
    .with_context(|| format!("computing {kind} for {} by {}", args.outcome, args.factor))?;
    info!(method = %table.method, levels = table.rows.len(), "computed association table");

    let rendered = render(&table, args.format)?;
    match &args.out {
        Some(out) => {
            let path = settings.join_output(out);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote association table");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Type a command-line value like the column it is looked up in. Unknown
/// columns fall back to plain inference; validation reports them.
fn typed_value(df: &DataFrame, column: &str, raw: &str) -> Level {
    df.column(column)
        .map(|series| Level::for_dtype(raw, series.dtype()))
        .unwrap_or_else(|_| Level::infer(raw))
}

fn render(table: &AssociationTable, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => table.to_dataframe()?.to_string(),
        OutputFormat::Csv => table.to_csv()?,
        OutputFormat::Json => serde_json::to_string_pretty(table)?,
    })
}
