use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dompet::{
    AppState, FileStore, KeyValueStore, MemoryStore, build_router, get_local_offset,
    graceful_shutdown, logging_middleware,
};

/// The web server for Dompet, a personal income and expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory the transactions are saved in.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Keep transactions in memory only, nothing is written to disk.
    #[arg(long, conflicts_with = "data_dir")]
    in_memory: bool,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical timezone used to decide what "today" and "this month" are.
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("\"{}\" is not a valid canonical timezone", args.timezone);
        return ExitCode::FAILURE;
    }

    let storage: Box<dyn KeyValueStore> = if args.in_memory {
        tracing::info!("Keeping transactions in memory");
        Box::new(MemoryStore::new())
    } else {
        match FileStore::open(&args.data_dir) {
            Ok(store) => Box::new(store),
            Err(error) => {
                tracing::error!(
                    "Could not open data directory {}: {error}",
                    args.data_dir.display()
                );
                return ExitCode::FAILURE;
            }
        }
    };

    let state = AppState::new(storage, &args.timezone);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log to stdout, filtered by `RUST_LOG` and defaulting to `info`.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers themselves.
        .on_failure(());

    router.layer(tracing_layer)
}
