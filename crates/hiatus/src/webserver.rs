//! HTTP listener with graceful shutdown

use axum::Router;
use tokio::net::TcpListener;

use crate::prelude::*;

pub async fn serve(listen: &str, router: Router) -> ClResult<()> {
	let listener = TcpListener::bind(listen).await.map_err(|e| {
		error!("FATAL: Cannot listen on {}: {}", listen, e);
		Error::ConfigError(format!("Cannot listen on {}: {}", listen, e))
	})?;
	info!("Listening on HTTP {}", listen);

	axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
	info!("Server stopped");

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Cannot install shutdown handler: {}", e);
		std::future::pending::<()>().await;
	}
	info!("Shutdown requested");
}

// vim: ts=4
