use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fht")]
#[command(about = "Fund holdings transaction history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two holdings files of one fund and print the transactions as CSV
    Diff {
        /// Earlier filing. Omit for a fund's first filing.
        #[arg(long)]
        previous: Option<String>,

        /// Later filing
        #[arg(long)]
        current: String,

        /// Diff every row, without the common-stock filter
        #[arg(long, default_value_t = false)]
        no_filter: bool,
    },

    /// Run the full pipeline over a holdings CSV
    Run {
        /// Holdings CSV covering one or more funds
        #[arg(long)]
        input: String,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Output directory (overrides output.dir)
        #[arg(long)]
        out: Option<String>,

        /// Also write the combined transactions file
        #[arg(long, default_value_t = false)]
        combine: bool,
    },

    /// Concatenate batch CSVs into one file
    Combine {
        #[arg(long)]
        dir: String,

        /// Defaults to <dir>/combined_output_transactions.csv
        #[arg(long)]
        out: Option<String>,
    },

    /// Print headline figures for a transactions CSV
    Summarize {
        #[arg(long)]
        input: String,

        #[arg(long = "fund")]
        funds: Vec<String>,

        /// e.g. "Q3 2024" or "2024Q3"
        #[arg(long)]
        quarter: Option<String>,

        #[arg(long = "symbol")]
        symbols: Vec<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn init_tracing() {
    // Logs go to stderr so `diff` output on stdout stays clean CSV.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Diff {
            previous,
            current,
            no_filter,
        } => commands::diff::run_diff(previous.as_deref(), &current, no_filter)?,

        Commands::Run {
            input,
            config_paths,
            out,
            combine,
        } => {
            commands::run::run_pipeline_cmd(commands::run::RunArgs {
                input,
                config_paths,
                out,
                combine,
            })
            .await?
        }

        Commands::Combine { dir, out } => commands::combine::run_combine(&dir, out.as_deref())?,

        Commands::Summarize {
            input,
            funds,
            quarter,
            symbols,
        } => commands::summarize::run_summarize(&input, funds, quarter, symbols)?,

        Commands::ConfigHash { paths } => {
            let loaded = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}
