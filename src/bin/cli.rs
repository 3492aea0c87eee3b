//! griddb-tql CLI
//!
//! Command-line interface for TQL generation:
//! - Render saved query state
//! - Expand macros in TQL text
//! - Parse variable queries
//! - Plan GridDB web API requests

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use griddb_tql::{
    expand, extract_container, generate_default_config, parse_variable_query, plan_annotation,
    plan_target, plan_variable_query, render, validate_target, AnnotationQuery, ApiCall, Config,
    MacroContext, QueryState, Target, TemplateVariable, TimeRange, VariableTable,
};

#[derive(Parser)]
#[command(name = "griddb-tql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render, expand and plan GridDB TQL queries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render query state JSON into TQL
    Render {
        /// Path to a query state JSON file
        #[arg(short, long)]
        state: PathBuf,
    },

    /// Expand macros and variables in TQL text
    Expand {
        /// TQL text
        text: String,
        /// Active time column (repeat for start and end)
        #[arg(short = 't', long = "time-column")]
        time_columns: Vec<String>,
        #[command(flatten)]
        expansion: ExpansionArgs,
    },

    /// Parse a variable query
    ParseVariable {
        /// Variable query text
        text: String,
        /// Also print the API call that answers it
        #[arg(long)]
        plan: bool,
    },

    /// Extract the container name from raw TQL
    Container {
        /// TQL text
        text: String,
    },

    /// Plan the TQL request for a panel target or annotation
    Plan {
        /// Path to a target JSON file
        #[arg(long, conflicts_with = "annotation", required_unless_present = "annotation")]
        target: Option<PathBuf>,
        /// Path to an annotation JSON file
        #[arg(long)]
        annotation: Option<PathBuf>,
        #[command(flatten)]
        expansion: ExpansionArgs,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Expansion inputs shared by `expand` and `plan`
#[derive(Args)]
pub struct ExpansionArgs {
    /// Range start: RFC 3339 or epoch milliseconds
    #[arg(long, requires = "to")]
    from: Option<String>,
    /// Range end: RFC 3339 or epoch milliseconds
    #[arg(long, requires = "from")]
    to: Option<String>,
    /// Requested interval in milliseconds
    #[arg(long)]
    interval_ms: Option<i64>,
    /// Minimum interval (default: from config)
    #[arg(long)]
    min_interval: Option<String>,
    /// Template variable as name=value; repeat a name for a multi-value selection
    #[arg(short = 'v', long = "var")]
    vars: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config);

    match cli.command {
        Commands::Render { state } => {
            let state: QueryState = read_json(&state)?;
            println!("{}", render(&state)?);
        }

        Commands::Expand {
            text,
            time_columns,
            expansion,
        } => {
            let variables = variable_table(&expansion.vars)?;
            let ctx = macro_context(&config, &expansion, &variables)?.with_time_columns(time_columns);
            println!("{}", expand(&text, &ctx)?);
        }

        Commands::ParseVariable { text, plan } => {
            let query = parse_variable_query(&text)?;
            println!("{}", serde_json::to_string_pretty(&query)?);
            if plan {
                print_call(&config, &plan_variable_query(&query))?;
            }
        }

        Commands::Container { text } => {
            println!("{}", extract_container(&text)?);
        }

        Commands::Plan {
            target,
            annotation,
            expansion,
        } => {
            let variables = variable_table(&expansion.vars)?;
            let ctx = macro_context(&config, &expansion, &variables)?;

            let request = match (target, annotation) {
                (Some(path), _) => {
                    let target: Target = read_json(&path)?;
                    if !validate_target(&target)? {
                        bail!("Target is hidden or incomplete, nothing to send");
                    }
                    plan_target(&target, &ctx)?
                }
                (None, Some(path)) => {
                    let annotation: AnnotationQuery = read_json(&path)?;
                    plan_annotation(&annotation, &ctx)?
                }
                (None, None) => bail!("Either --target or --annotation is required"),
            };

            print_call(&config, &ApiCall::tql(vec![request]))?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("griddb_tql={}", config.logging.level)),
    );

    // Logs go to stderr so stdout stays pipeable
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn macro_context<'a>(
    config: &Config,
    args: &ExpansionArgs,
    variables: &'a VariableTable,
) -> anyhow::Result<MacroContext<'a>> {
    let min_interval = args
        .min_interval
        .clone()
        .unwrap_or_else(|| config.datasource.min_interval.clone());

    let mut ctx = MacroContext::new()
        .with_min_interval(min_interval)
        .with_variables(variables);

    if let Some(interval) = args.interval_ms {
        ctx = ctx.with_interval_ms(interval);
    }
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        ctx = ctx.with_range(TimeRange::new(parse_time(from)?, parse_time(to)?));
    }

    Ok(ctx)
}

fn parse_time(s: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(ms) = s.parse::<i64>() {
        if let Some(dt) = chrono::DateTime::from_timestamp_millis(ms) {
            return Ok(dt);
        }
    }
    bail!("Invalid time '{}': expected RFC 3339 or epoch milliseconds", s)
}

/// Collect `name=value` pairs; repeated names form a multi-value selection
fn variable_table(vars: &[String]) -> anyhow::Result<VariableTable> {
    let mut selections: Vec<(String, Vec<String>)> = Vec::new();

    for var in vars {
        let Some((name, value)) = var.split_once('=') else {
            bail!("Invalid variable '{}': expected name=value", var);
        };
        let name = name.trim();
        match selections.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => selections.push((name.to_string(), vec![value.to_string()])),
        }
    }

    Ok(selections
        .into_iter()
        .map(|(name, mut values)| {
            if values.len() == 1 {
                TemplateVariable::new(name, values.remove(0))
            } else {
                TemplateVariable::new(name, values).multi(true)
            }
        })
        .collect())
}

fn print_call(config: &Config, call: &ApiCall) -> anyhow::Result<()> {
    let server = config
        .datasource
        .urls
        .first()
        .map(String::as_str)
        .unwrap_or_default();

    let output = serde_json::json!({
        "method": call.endpoint.method(),
        "url": call.endpoint.url(server, &config.datasource.cluster, &config.datasource.database),
        "body": call.body,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
