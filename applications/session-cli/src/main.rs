/// Soul Session - drive a media session from the terminal
use clap::Parser;
use soul_session::SessionService;
use soul_session_cli::{
    app::{execute, print_events, Flow},
    catalogue::{demo_catalogue, load_catalogue},
    commands::{parse_line, HELP},
    config::CliConfig,
    engine::SimulatedEngine,
};
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-session")]
#[command(about = "Drive a Soul Player media session from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./session.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Track catalogue (JSON array), overrides library.catalogue
    #[arg(long)]
    catalogue: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soul_session=info,soul_session_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(catalogue) = cli.catalogue {
        config.library.catalogue = Some(catalogue);
    }
    config.validate()?;

    let library = match &config.library.catalogue {
        Some(path) => load_catalogue(path)?,
        None => {
            tracing::info!("No catalogue configured, using demo library");
            demo_catalogue()
        }
    };
    tracing::info!("Library: {} tracks", library.len());
    let library = Arc::new(library);

    let engine_settings = config.engine.clone();
    let session = SessionService::spawn(
        library.clone(),
        move |sink| SimulatedEngine::new(sink, &engine_settings),
        config.session.clone(),
    );
    let printer = tokio::spawn(print_events(session.subscribe()));

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{} (type `help` for commands)", e);
                continue;
            }
        };

        match execute(&session, library.as_ref(), &config.library.client_id, input).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("error: {}", e),
        }
    }

    session.shutdown().await?;

    // Printer drains what is left once the last sender is gone
    drop(session);
    printer.await?;

    tracing::info!("Bye");
    Ok(())
}
