//! schemac CLI - C code generator for JSON schemas
//!
//! Commands:
//! - `schemac generate` - Generate `<module>.h` / `<module>.c` per schema
//! - `schemac check` - Load and validate schemas without writing anything
//! - `schemac decode` - Round-trip a JSON document through the reference codec

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod decode;
mod format;
mod generate;
mod logging;

#[derive(Parser)]
#[command(name = "schemac")]
#[command(author, version, about = "C code generator for JSON protocol schemas", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate C header and source files
    Generate {
        /// Schema files; each produces one module named after the file stem
        #[arg(required = true)]
        schemas: Vec<PathBuf>,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Additional directory searched for dependency schemas
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// Path to schemac.toml (default: ./schemac.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the external formatter
        #[arg(long)]
        no_format: bool,

        /// Directory receiving one `<module>.context.json` build context per schema
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Validate schemas and report ambiguous variant arms
    Check {
        #[arg(required = true)]
        schemas: Vec<PathBuf>,

        /// Additional directory searched for dependency schemas
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// Path to schemac.toml (default: ./schemac.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decode a JSON document as a schema type and print its canonical encoding
    Decode {
        /// Schema declaring the type
        schema: PathBuf,

        /// Type to decode as
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// JSON input file (default: stdin)
        input: Option<PathBuf>,

        /// Additional directory searched for dependency schemas
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// Path to schemac.toml (default: ./schemac.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            schemas,
            output,
            include,
            config,
            no_format,
            context,
        } => {
            let options = generate::GenerateOptions {
                output,
                include,
                config,
                no_format,
                context,
            };
            generate::run(&schemas, &options)?;
        }
        Commands::Check {
            schemas,
            include,
            config,
        } => {
            check::run(&schemas, &include, config.as_deref())?;
        }
        Commands::Decode {
            schema,
            type_name,
            input,
            include,
            config,
        } => {
            decode::run(
                &schema,
                &type_name,
                input.as_deref(),
                &include,
                config.as_deref(),
            )?;
        }
    }

    Ok(())
}
