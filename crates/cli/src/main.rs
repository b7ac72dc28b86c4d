mod commands;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "schema-doctor")]
#[command(about = "Schema-quality linter for ORM-backed databases")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detectors against a database or a schema snapshot
    Check {
        /// JSON schema snapshot written by `schema-doctor dump`
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// PostgreSQL connection URL (falls back to DATABASE_URL, then [database] url in config)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Database schema (namespace) to inspect
        #[arg(long)]
        schema: Option<String>,

        /// TOML file listing ORM models as [[models]] name/table_name pairs
        #[arg(short, long)]
        models: Option<PathBuf>,

        /// Path to config file (default: .schema-doctor.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run only these detectors (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        detectors: Option<Vec<String>>,

        /// Exclude these detectors (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Output format (default: [global] output_format in config)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Suppress banner and summary
        #[arg(short, long)]
        quiet: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Write the live database schema to a JSON snapshot
    Dump {
        /// PostgreSQL connection URL
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        /// Database schema (namespace) to inspect
        #[arg(long, default_value = "public")]
        schema: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List all available detectors
    List,
    /// Generate a default .schema-doctor.toml config file
    Init {
        /// Where to write the config file
        #[arg(short, long, default_value = ".schema-doctor.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Prefill [database] url
        #[arg(long)]
        database_url: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            snapshot,
            database_url,
            schema,
            models,
            config,
            detectors,
            exclude,
            format,
            quiet,
            no_color,
        } => commands::check::run(commands::check::CheckArgs {
            snapshot,
            database_url,
            schema,
            models,
            config,
            detectors,
            exclude,
            format,
            quiet,
            no_color,
        }),
        Commands::Dump {
            database_url,
            schema,
            output,
        } => commands::dump::run(&database_url, &schema, output.as_deref()).map(|()| true),
        Commands::List => commands::list::run().map(|()| true),
        Commands::Init {
            path,
            force,
            database_url,
        } => commands::init::run(&path, force, database_url.as_deref()).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
