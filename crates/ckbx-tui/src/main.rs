//! ckbx - A terminal address page for the Nervos CKB block explorer.

mod action;
mod app;
mod clipboard;
mod config;
mod context;
mod dump;
mod event;
mod fetch;
mod location;
mod log_buffer;
mod page;
mod theme;
mod tui;
mod ui;

use std::sync::Arc;

use action::{Action, FetchRequest};
use app::App;
use ckbx_api::{ExplorerClient, Fetcher};
use ckbx_core::{AppConfig, Network};
use clap::Parser;
use color_eyre::Result;
use config::{Overrides, Settings};
use event::{Event, EventHandler};
use location::Route;
use log_buffer::{LogBuffer, LogBufferLayer};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tui::Tui;

/// ckbx - Browse a CKB address and its transactions from the terminal.
#[derive(Parser, Debug)]
#[command(name = "ckbx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to open (defaults to the last one viewed)
    address: Option<String>,

    /// Location to open, e.g. "/address/ckb1...?page=2&size=20"
    #[arg(long, conflicts_with = "address")]
    path: Option<String>,

    /// Network to use
    #[arg(short, long)]
    network: Option<NetworkArg>,

    /// Custom explorer API base URL
    #[arg(long = "api-url")]
    api_url: Option<String>,

    /// Page of transactions to open
    #[arg(long)]
    page: Option<u32>,

    /// Transactions per page
    #[arg(long)]
    size: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Show failed fetches as toasts as well as in the log panel
    #[arg(long)]
    toast_errors: bool,

    /// Dump mode: load the page once, print it to stdout and exit.
    #[arg(long)]
    dump: bool,
}

/// Network argument that can be parsed from string.
#[derive(Debug, Clone)]
struct NetworkArg(Network);

impl std::str::FromStr for NetworkArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "ckb" => Ok(NetworkArg(Network::Mainnet)),
            "testnet" | "test" | "ckt" | "pudge" => Ok(NetworkArg(Network::Testnet)),
            _ => {
                let valid: Vec<String> = Network::all()
                    .iter()
                    .map(|n| n.to_string().to_lowercase())
                    .collect();
                Err(format!(
                    "Unknown network '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                ))
            }
        }
    }
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            address: self.address.clone(),
            path: self.path.clone(),
            network: self.network.as_ref().map(|n| n.0),
            api_url: self.api_url.clone(),
            page: self.page,
            size: self.size,
            timeout_secs: self.timeout,
            toast_errors: self.toast_errors,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Create shared log buffer
    let log_buffer = LogBuffer::new();

    // Initialize logging - use stderr for dump mode, buffer for TUI
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("ckbx=info".parse()?)
        .add_directive("ckbx_api=info".parse()?)
        .add_directive("ckbx_core=info".parse()?);

    if args.dump {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(LogBufferLayer::new(log_buffer.clone(), tracing::Level::DEBUG))
            .init();
    }

    // Load configuration
    let mut app_config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    let settings = Settings::resolve(&app_config, &args.overrides());

    let client = ExplorerClient::new(&settings.client_config())?;
    tracing::info!("Using {} API at {}", client.network(), client.base_url());

    if args.dump {
        return dump::run_dump(&client, client.network(), &settings.start).await;
    }

    // Detect terminal theme (must be done before entering raw mode)
    let theme = theme::Theme::resolve(settings.theme);

    let fetcher: Arc<dyn Fetcher> = Arc::new(client);
    let last_address = run_tui(&settings, fetcher, log_buffer, theme).await?;

    // Remember the last address viewed for the next start
    if let Some(address) = last_address {
        app_config.remember_address(&address, settings.network);
        if let Err(e) = config::save_config(&app_config) {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    Ok(())
}

/// Run the interactive UI until quit. Returns the address on screen at exit.
async fn run_tui(
    settings: &Settings,
    fetcher: Arc<dyn Fetcher>,
    log_buffer: LogBuffer,
    theme: theme::Theme,
) -> Result<Option<String>> {
    // Action channel for fetch results back to the UI
    const ACTION_CHANNEL_CAPACITY: usize = 100;
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(ACTION_CHANNEL_CAPACITY);

    // Request channel for the fetch task
    const REQUEST_CHANNEL_CAPACITY: usize = 50;
    let (request_tx, request_rx) = mpsc::channel::<FetchRequest>(REQUEST_CHANNEL_CAPACITY);

    let cancel = CancellationToken::new();
    let fetch_handle = tokio::spawn(fetch::fetch_task(
        fetcher,
        request_rx,
        action_tx,
        cancel.clone(),
    ));

    let mut app = App::new(settings.network, settings.start.clone(), log_buffer, theme)
        .with_error_toasts(settings.toast_fetch_errors);

    // Initialize terminal
    tui::install_panic_hook();
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut events = EventHandler::new(100);

    let requests = app.sync_location();
    send_requests(&request_tx, requests).await;

    // Main loop
    loop {
        tui.draw(|frame| ui::render(frame, &mut app))?;

        tokio::select! {
            event = events.next() => {
                match event? {
                    Event::Tick => app.tick(),
                    Event::Key(key) => {
                        if let Some(action) = app.handle_key(key) {
                            let requests = app.handle_action(action);
                            send_requests(&request_tx, requests).await;
                        }
                    }
                    Event::Resize => {}
                }
            }
            Some(action) = action_rx.recv() => {
                let requests = app.handle_action(action);
                send_requests(&request_tx, requests).await;
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    tui.exit()?;

    cancel.cancel();
    if let Err(e) = fetch_handle.await {
        tracing::warn!("Fetch task ended abnormally: {}", e);
    }

    tracing::info!("Exiting at {}", app.location().href());
    Ok(match &app.route {
        Route::Address(address) => Some(address.clone()),
        Route::Home | Route::NotFound => None,
    })
}

async fn send_requests(request_tx: &mpsc::Sender<FetchRequest>, requests: Vec<FetchRequest>) {
    for request in requests {
        if request_tx.send(request).await.is_err() {
            tracing::error!("Fetch task is gone; request dropped");
        }
    }
}
