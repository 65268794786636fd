// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xcore broker daemon.
//!
//! Loads configuration, opens the job store, installs the `SIGCHLD`
//! handler, and runs the single-threaded dispatcher loop until asked
//! to stop.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lock;

use std::fs::OpenOptions;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use xcore_config::Config;
use xcore_engine::{Dispatcher, DispatcherEnv, ProcessorTable};
use xcore_registry::Registry;
use xcore_storage::JobStore;
use xcore_supervisor::Supervisor;
use xcore_workdir::WorkDirManager;

use lock::BrokerLock;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "version" | "--version" | "-V" => {
                println!("xcore {VERSION}");
                return;
            }
            "--help" | "-h" | "help" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: xcore [version | --help]");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = run().await {
        eprintln!("xcore: {e}");
        std::process::exit(1);
    }
}

fn print_help() {
    println!("xcore {VERSION}");
    println!("Backup job orchestrator broker");
    println!();
    println!("USAGE:");
    println!("    xcore            Run the broker dispatch loop in the foreground");
    println!("    xcore version    Print version information");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let _log_guard = setup_logging(&config)?;
    info!("starting xcore broker");

    // SAFETY: called once, before any plugin child is spawned.
    unsafe {
        xcore_supervisor::install()?;
    }

    // Single-broker-per-deployment: refuse to start a second instance
    // against the same run_path.
    let _lock = BrokerLock::acquire(&config.run_path().join("broker.lock"))?;

    let database_url = format!(
        "mysql://{}:{}@{}:{}/xcore",
        config.database_user(),
        config.database_pass(),
        config.database_server(),
        config.database_port(),
    );
    let store = JobStore::connect(&database_url).await?;
    let registry = Registry::scan(config.plugin_home())?;
    let workdir = WorkDirManager::new(config.run_path().to_path_buf());
    let supervisor = Supervisor::new();

    let env = DispatcherEnv {
        store,
        clock: Box::new(xcore_core::SystemClock),
        workdir,
        registry,
        supervisor,
        processors: ProcessorTable::standard(),
    };
    let mut dispatcher = Dispatcher::new(env);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("broker ready, entering dispatch loop");
    loop {
        tokio::select! {
            result = dispatcher.tick() => {
                match result {
                    Ok(true) => {}
                    Ok(false) => tokio::time::sleep(std::time::Duration::from_secs(1)).await,
                    Err(e) => error!(error = %e, "dispatcher tick failed"),
                }
                xcore_supervisor::reap_zombies();
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    info!("broker stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Touch the file so `rolling::never` can open it even on first run.
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let file_appender = tracing_appender::rolling::never(
        config.log_path().parent().ok_or("log path has no parent")?,
        config
            .log_path()
            .file_name()
            .ok_or("log path has no file name")?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
