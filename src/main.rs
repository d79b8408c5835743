//! Route tree inspector.
//!
//! Loads a TOML route tree, compiles it against an in-memory host and
//! prints every registration it would produce.
//!
//! ```text
//! routes.toml
//!     → config (load, validate)
//!     → config::resolve (names bound to labels)
//!     → routing::RouteCompiler (RecordingHost)
//!     → table or JSON on stdout
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use nested_routes::config::load_config;
use nested_routes::inspect::inspect;
use nested_routes::observability::init_logging;

#[derive(Parser)]
#[command(name = "nested-routes")]
#[command(about = "Compile a nested route tree and list its registrations", long_about = None)]
struct Cli {
    /// Route tree file (TOML).
    config: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Also print the path word index.
    #[arg(short, long)]
    words: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.logging)?;

    tracing::info!(
        config = %cli.config.display(),
        roots = config.routes.len(),
        "Configuration loaded"
    );

    let inspection = inspect(&config)?;

    match cli.format {
        Format::Table => {
            print!("{}", inspection.render_table());
            if cli.words {
                println!();
                print!("{}", inspection.render_words());
            }
        }
        Format::Json => {
            let json = if cli.words {
                serde_json::to_string_pretty(&inspection)?
            } else {
                serde_json::to_string_pretty(&inspection.routes)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
