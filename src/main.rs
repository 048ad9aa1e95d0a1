use std::{
    future::IntoFuture,
    io::{self, Write},
    process,
    sync::Arc,
};

use thoughtcard::{
    application::{
        error::AppError,
        render::{RenderPipelineConfig, RenderService, configure_render_service, render_service},
    },
    config::{self, RenderArgs},
    infra::{
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::sync::oneshot;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match command {
        config::Command::Serve(_) => run_serve(&settings).await,
        config::Command::Render(args) => run_render(&args),
    }
}

fn run_render(args: &RenderArgs) -> Result<(), AppError> {
    let request = args.to_request();
    let html = render_service().render(&request)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(html.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| AppError::from(InfraError::from(err)))
}

async fn run_serve(settings: &config::Settings) -> Result<(), AppError> {
    let renderer: Arc<dyn RenderService> = render_service();
    let router = http::build_router(HttpState::new(renderer));

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "thoughtcard::http",
        addr = %settings.server.addr,
        "listening"
    );

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        },
    );
    let mut server = tokio::spawn(server.into_future());

    let result = tokio::select! {
        joined = &mut server => joined,
        _ = signalled_rx => {
            let grace = settings.server.graceful_shutdown;
            info!(
                target = "thoughtcard::http",
                grace_seconds = grace.as_secs(),
                "shutdown requested, draining connections"
            );
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(
                        target = "thoughtcard::http",
                        grace_seconds = grace.as_secs(),
                        "graceful shutdown timed out, aborting open connections"
                    );
                    server.abort();
                    Ok(Ok(()))
                }
            }
        }
    };

    result
        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "thoughtcard::http",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}
