//! banker - Banker's-algorithm deadlock avoidance
//!
//! Loads a scenario, hands the allocator to the service actor and runs one
//! command (or the interactive menu) against it.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod menu;
mod ops;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::ops::OperationResult;
use banker_config::Config;
use banker_events::{EventEmitter, EventReceiver, EventSender};
use banker_service::AllocatorHandle;
use banker_types::{ColorChoice, OutputFormat};
use clap::Parser;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting banker v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    let allocator = config.load_scenario().await?.into_allocator()?;
    info!(
        processes = allocator.process_count(),
        resources = allocator.resource_count(),
        "Scenario loaded"
    );

    let (event_sender, event_receiver) = banker_events::channel();
    let handle = banker_service::spawn(allocator, Some(event_sender.clone()));
    event_sender.emit_debug(format!(
        "scenario has {} processes and {} resource classes",
        handle.process_count(),
        handle.resource_count()
    ));

    let renderer = OutputRenderer::new(config.general.default_output, config.general.color);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug);

    let result = execute_command_with_events(
        cli.command,
        &handle,
        &renderer,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    handle: &AllocatorHandle,
    renderer: &OutputRenderer,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let operation = command.name();
    event_sender.emit_operation_started(operation);

    let mut command_future = Box::pin(execute_command(command, handle, renderer, &event_sender));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                match &result {
                    Ok(_) => event_sender.emit_operation_completed(operation, true),
                    Err(e) => event_sender.emit_operation_failed(operation, e.to_string()),
                }
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    handle: &AllocatorHandle,
    renderer: &OutputRenderer,
    events: &EventSender,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Show => ops::show(handle).await,
        Commands::Check => ops::check(handle).await,
        Commands::Request { pid, units } => ops::request(handle, pid, units).await,
        Commands::Verify { sequence } => ops::verify(handle, sequence).await,
        Commands::Menu => menu::run(handle, renderer, events, tokio::io::stdin()).await,
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::logs_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "banker-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,banker=debug,banker_engine=debug,banker_service=debug",
                                )
                            },
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress console logging to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,banker=warn")
                }),
            )
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(path) = &global.scenario {
        config.scenario.path = Some(path.clone());
    }
}
