use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::filter::{EnvFilter, FilterExt, LevelFilter, Targets};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use pollbench::cli::Cli;
use pollbench::Runtime;

fn main() -> ExitCode {
    #[cfg(not(target_os = "linux"))]
    compile_error!("only linux is supported");

    // RUST_LOG can raise verbosity but never hides our own warnings and
    // errors.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pollbench=info".into())
        .or(Targets::new().with_target("pollbench", LevelFilter::WARN));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let config = Cli::parse().into_config();

    let mut runtime = match Runtime::bind(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(
                error = %e,
                os_error = e.io_error().raw_os_error(),
                "listener setup failed"
            );
            return ExitCode::FAILURE;
        }
    };

    let addr = runtime.local_addr().unwrap_or(config.addr);
    println!("epoll HTTP server starting on {}", addr);

    if let Err(e) = runtime.run() {
        tracing::error!(error = %e, "waiting for events failed");
    }

    let stats = runtime.stats();
    tracing::info!(
        accepted = stats.accepted,
        responded = stats.responded,
        hung_up = stats.hung_up,
        abandoned = stats.abandoned,
        "event loop stopped"
    );

    ExitCode::SUCCESS
}
