mod document;
mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};
use deepmarket_core::config::LOCAL_CONFIG_FILE;
use deepmarket_core::{Config, QueryClient, ReportBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deepmarket")]
#[command(about = "Cited market research reports from a single topic", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a report for a topic and print or save it
    Report {
        /// Market topic, e.g. "AI in healthcare"
        #[arg(required = true)]
        topic: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Query this model instead of the configured one
        #[arg(long)]
        model: Option<String>,
    },
    /// Serve the report preview in a browser
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3333)]
        port: u16,

        /// Do not open the browser
        #[arg(long)]
        no_open: bool,
    },
    /// Write a default config file to the current directory
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            topic,
            format,
            output,
            model,
        } => {
            let topic = document::validate_topic(&topic.join(" "))?;
            let config = load_config(cli.config.as_ref())?;
            let client = QueryClient::new(&config)?;
            let mut builder = ReportBuilder::new(client);
            if let Some(model) = model {
                builder = builder.with_model(model);
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("Researching '{}'", topic));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let report = builder.build(&topic).await;
            spinner.finish_and_clear();

            let rendered = match format {
                Format::Markdown => report.to_markdown(),
                Format::Json => serde_json::to_string_pretty(&report)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .wrap_err_with(|| format!("writing {}", path.display()))?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }

            if report.is_degraded() {
                eprintln!("Some sections could not be fetched; see placeholders in the report.");
            }
        }
        Commands::Serve { port, no_open } => {
            let config = load_config(cli.config.as_ref())?;
            let serve_config = serve::ServeConfig {
                port,
                open_browser: !no_open,
            };
            serve::start_server(config, serve_config).await?;
        }
        Commands::Init => {
            if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
                bail!("{} already exists", LOCAL_CONFIG_FILE);
            }
            std::fs::write(LOCAL_CONFIG_FILE, Config::default_config_string())?;
            println!("Created {}", LOCAL_CONFIG_FILE);
            println!("Set PERPLEXITY_API_KEY in your environment before running a report.");
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> color_eyre::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "deepmarket_core=debug,deepmarket_cli=debug,tower_http=debug"
    } else {
        "deepmarket_core=warn,deepmarket_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
