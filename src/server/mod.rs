//! # HTTP Server for Label Printing
//!
//! A one-field web form that prints a text label.
//!
//! ## Usage
//!
//! ```bash
//! dymoprint-web --listen 0.0.0.0:5000
//! ```
//!
//! Then open http://localhost:5000 in a browser, or print directly with
//! `GET /?text=Hello`.
//!
//! Requests are served concurrently but printing is serialised: each job
//! holds the printer lock for its whole run, on a blocking worker thread.

mod handlers;
mod state;

pub use handlers::{LabelQuery, Notice, render_page};
pub use state::{AppState, ServerConfig};

use std::sync::Arc;

use axum::{Router, routing::get};
use log::info;

use crate::error::Error;
use crate::transport::Transport;

/// Build the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use dymoprint::printer::Capability;
/// use dymoprint::server::{serve, ServerConfig};
/// use dymoprint::transport::HidTransport;
///
/// # async fn example() -> Result<(), dymoprint::Error> {
/// let capability = Capability::LABELMANAGER_PNP;
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:5000".to_string(),
///     capability,
///     font: "builtin".to_string(),
///     gutter: 4,
/// };
///
/// serve(config, Box::new(HidTransport::auto(&capability))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, transport: Box<dyn Transport + Send>) -> Result<(), Error> {
    let listen_addr = config.listen_addr.clone();
    let app = router(Arc::new(AppState::new(config, transport)));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| Error::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    info!("listening on {}", listen_addr);
    println!("dymoprint web form on http://{}/", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
