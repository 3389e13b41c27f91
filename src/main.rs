use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use notedown::config::Config;
use notedown::site::Site;
use notedown::{serve, watch, CONFIG_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(about, version)]
struct Args {
    /// config file, missing is fine
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// command, `build` when left out
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// convert the notes and generate the table of contents
    Build,
    /// rebuild whenever a note or template changes
    Watch,
    /// build, then serve the generated files
    Serve {
        /// port to listen on, overrides the config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// clean up the generated files
    Clean,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notedown=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Encountered error `{err:?}`");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let site = Site::new(config)?;
    match args.command.unwrap_or(Commands::Build) {
        Commands::Build => {
            let summary = site.build().await?;
            match summary.toc {
                Some(toc) => println!(
                    "Built {} pages, table of contents at `{}`",
                    summary.pages.len(),
                    toc.display()
                ),
                None => println!("No markdown files found"),
            }
        }
        Commands::Watch => watch::watch(&site).await?,
        Commands::Serve { port } => {
            site.build().await?;
            let port = port.unwrap_or(site.config().serve.port);
            serve::serve(serve::router(site.site_dir()), port).await?;
        }
        Commands::Clean => site.clean().await?,
    }
    Ok(())
}
