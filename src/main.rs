mod api;
mod bot;
mod cli;
mod monitor;
mod prelude;
mod reading;
mod render;
mod units;

use clap::{Parser, crate_version};

use crate::{
    api::{RealTimeSource, SolaxCloud, Telegram},
    cli::{Args, Command, SolaxApiArgs},
    monitor::Monitor,
    prelude::*,
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    let args = Args::parse();
    info!(version = crate_version!(), "Starting…");

    match args.command {
        Command::Sentry(args) => {
            let monitor = Monitor::spawn(try_solax(&args.solax)?, args.poll.period());
            let telegram = Telegram::try_new(&args.telegram.endpoint, &args.telegram.bot_token)?;
            let latest = monitor.latest();
            tokio::select! {
                result = bot::run(&telegram, &latest) => result?,
                () = shutdown_signal() => info!("Shutting down…"),
            }
            monitor.stop().await;
            Ok(())
        }

        Command::Forage(args) => {
            let monitor = Monitor::spawn(try_solax(&args.solax)?, args.poll.period());
            shutdown_signal().await;
            info!("Shutting down…");
            monitor.stop().await;
            Ok(())
        }

        Command::Peek(args) => {
            let reading = try_solax(&args.solax)?.fetch().await?;
            println!("{}", render::build_reading_table(&reading));
            Ok(())
        }
    }
}

fn try_solax(args: &SolaxApiArgs) -> Result<SolaxCloud> {
    SolaxCloud::try_new(
        &args.endpoint,
        args.api_version,
        args.token_id.clone(),
        args.serial_number.clone(),
    )
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
