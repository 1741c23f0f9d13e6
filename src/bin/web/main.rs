use std::{net::SocketAddr, process::ExitCode, str::FromStr};

use social::{bootstrap::Boostrap, config::Config, dependencies::AppState, routes::create_routes};
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
	println!("Environment Variable Is Being Set...");
	let config = match Config::new() {
		Ok(config) => config,
		Err(err) => {
			eprintln!("configuration error: {err}");
			return ExitCode::FAILURE;
		}
	};

	// ! Tracing
	Boostrap::tracing(&config);

	// ! Connection
	tracing::info!("Connections Are Being Pooled...");
	let state = match AppState::connect(config).await {
		Ok(state) => state,
		Err(err) => {
			tracing::error!(error = %err, "database connection pool could not be established");
			return ExitCode::FAILURE;
		}
	};
	if let Err(err) = Boostrap::migrate(state.storage.posts.executor.connection()).await {
		tracing::error!(error = %err, "could not migrate database");
		return ExitCode::FAILURE;
	}

	let addr = match SocketAddr::from_str(&state.config.server_ip_port) {
		Ok(addr) => addr,
		Err(err) => {
			tracing::error!(error = %err, addr = %state.config.server_ip_port, "invalid ADDR");
			return ExitCode::FAILURE;
		}
	};
	tracing::info!(%addr, env = %state.config.env, api_url = %state.config.api_url, "Start Web Server...");

	let app = create_routes(state);
	let server = axum::Server::bind(&addr)
		.serve(app.into_make_service())
		.with_graceful_shutdown(shutdown_signal());

	if let Err(err) = server.await {
		tracing::error!(error = %err, "server error");
		return ExitCode::FAILURE;
	}

	tracing::info!("Server shut down");
	ExitCode::SUCCESS
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = signal::ctrl_c().await {
			tracing::error!(error = %err, "failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
		tracing::info!("Received Ctrl+C, shutting down");
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
				tracing::info!("Received terminate signal, shutting down");
			}
			Err(err) => {
				tracing::error!(error = %err, "failed to install signal handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
