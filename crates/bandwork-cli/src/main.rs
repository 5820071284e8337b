//! bandwork CLI - formula checks and report rendering

use anyhow::{bail, Context, Result};
use bandwork::prelude::*;
use bandwork::{parse_date, read_record, FunctionInfo};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bandwork")]
#[command(author, version, about = "Report designer formula and print tool")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a formula against the declared data fields
    Validate {
        formula: String,

        /// Declared field, `name` for the master record or `name:detail`
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Evaluate a formula and print the result
    Eval {
        formula: String,

        /// Master record as an inline JSON object
        #[arg(long)]
        record: Option<String>,

        /// Detail rows (.json array or .csv)
        #[arg(long)]
        rows: Option<PathBuf>,

        /// Fixed current time, e.g. 2024-06-01T09:30:00
        #[arg(long)]
        now: Option<String>,
    },

    /// Render a design and print each page
    Render {
        /// Design document (.json)
        design: PathBuf,

        /// Detail rows (.json array or .csv)
        #[arg(long)]
        rows: Option<PathBuf>,

        /// Master record (.json object)
        #[arg(long)]
        master: Option<PathBuf>,

        /// Detail rows per page
        #[arg(long)]
        rows_per_page: Option<usize>,

        /// Placeholder for objects whose formula failed
        #[arg(long, default_value = "")]
        error_text: String,

        /// Fixed current time, e.g. 2024-06-01T09:30:00
        #[arg(long)]
        now: Option<String>,

        /// Print the rendered report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered formula functions
    Functions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Validate { formula, fields } => validate(&formula, &fields),
        Commands::Eval {
            formula,
            record,
            rows,
            now,
        } => eval(&formula, record.as_deref(), rows.as_deref(), now.as_deref()),
        Commands::Render {
            design,
            rows,
            master,
            rows_per_page,
            error_text,
            now,
            json,
        } => render(
            &design,
            rows.as_deref(),
            master.as_deref(),
            RenderOptions {
                rows_per_page,
                error_text,
                ..Default::default()
            },
            now.as_deref(),
            json,
        ),
        Commands::Functions => list_functions(),
    }
}

/// `name` or `name:detail` / `name:master`
fn parse_field(spec: &str) -> Result<DataField> {
    match spec.split_once(':') {
        None => Ok(DataField::master(spec.trim())),
        Some((name, "detail")) => Ok(DataField::detail(name.trim())),
        Some((name, "master")) => Ok(DataField::master(name.trim())),
        Some((_, source)) => bail!("Unknown field source '{}' in '{}'", source, spec),
    }
}

fn parse_clock(now: Option<&str>) -> Result<Option<FixedClock>> {
    now.map(|text| {
        parse_date(text)
            .map(FixedClock)
            .with_context(|| format!("Invalid --now value '{}'", text))
    })
    .transpose()
}

fn load_rows(path: Option<&Path>) -> Result<Vec<Record>> {
    match path {
        Some(path) => {
            read_rows(path).with_context(|| format!("Failed to read rows from '{}'", path.display()))
        }
        None => Ok(Vec::new()),
    }
}

fn validate(formula: &str, fields: &[String]) -> Result<()> {
    let fields = fields
        .iter()
        .map(|f| parse_field(f))
        .collect::<Result<Vec<_>>>()?;

    let engine = FormulaEngine::new();
    let outcome = engine.validate_formula(formula, &fields);
    if outcome.valid {
        println!("{}", outcome.message);
        Ok(())
    } else {
        bail!("{}", outcome.message)
    }
}

fn eval(formula: &str, record: Option<&str>, rows: Option<&Path>, now: Option<&str>) -> Result<()> {
    let master: Record = match record {
        Some(json) => serde_json::from_str(json).context("Invalid --record JSON")?,
        None => Record::new(),
    };
    let rows = load_rows(rows)?;
    let clock = parse_clock(now)?;

    let engine = FormulaEngine::new();
    let mut ctx = EvaluationContext::new(&master).with_rows(&rows, &rows);
    if let Some(clock) = &clock {
        ctx = ctx.with_clock(clock);
    }

    let outcome = engine.evaluate_formula(formula, &ctx);
    if !outcome.valid {
        bail!("{}", outcome.message.unwrap_or_default());
    }
    println!("{}", outcome.result);
    Ok(())
}

fn render(
    design_path: &Path,
    rows: Option<&Path>,
    master: Option<&Path>,
    options: RenderOptions,
    now: Option<&str>,
    json: bool,
) -> Result<()> {
    let design = Design::load(design_path)
        .with_context(|| format!("Failed to open '{}'", design_path.display()))?;
    let rows = load_rows(rows)?;
    let master = match master {
        Some(path) => read_record(path)
            .with_context(|| format!("Failed to read master record '{}'", path.display()))?,
        None => Record::new(),
    };
    let clock = parse_clock(now)?;

    let engine = FormulaEngine::new();
    let mut renderer = ReportRenderer::new(&engine).with_options(options);
    if let Some(clock) = &clock {
        renderer = renderer.with_clock(clock);
    }
    let report = renderer.render(&design, &master, &rows);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report);
    }

    let stats = &report.stats;
    eprintln!(
        "Rendered {} pages ({} objects, {} missing fields, {} errors)",
        stats.pages, stats.objects_rendered, stats.missing_fields, stats.errors
    );
    Ok(())
}

fn list_functions() -> Result<()> {
    let engine = FormulaEngine::new();
    let functions: Vec<FunctionInfo> = engine.registered_functions();
    for f in &functions {
        println!(
            "{:<12}{:<10}{:<14}{}",
            f.name,
            f.category.to_string(),
            f.arity.to_string(),
            f.description
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("amount:detail").unwrap(), DataField::detail("amount"));
        assert_eq!(parse_field("customer").unwrap(), DataField::master("customer"));
        assert!(parse_field("x:elsewhere").is_err());
    }

    #[test]
    fn test_parse_clock() {
        assert!(parse_clock(None).unwrap().is_none());
        assert!(parse_clock(Some("2024-06-01T09:30:00")).unwrap().is_some());
        assert!(parse_clock(Some("tomorrow")).is_err());
    }
}
