//! Malvern Store, a small server-rendered storefront.
//!
//! Product listing, a signed-cookie cart, checkout with an emailed
//! receipt, username/password auth with one seeded admin account, a
//! contact form, and a pass-through chat endpoint that forwards user
//! text to a hosted completion API.
//!
//! # Infrastructure
//! - The catalog is a flat JSON file re-read per request; there is no
//!   database and no order history.
//! - All per-browser state (login identity and cart) lives in one signed
//!   cookie; the server keeps only the user directory in memory.
//! - Outbound traffic is SMTP for receipts/contact mail and HTTPS for
//!   the completion API. Neither is retried.
//!
//! # Setup
//! ```sh
//! PORT=10000 SECRET_KEY=... MAIL_USERNAME=... MAIL_PASSWORD=... \
//! OPENAI_API_KEY=... cargo run
//! ```
use axum::{
    routing::{get, post},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod mail;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;
pub mod users;

use config::Config;
use routes::{
    add_to_cart_handler, admin_handler, chat_handler, chat_page, checkout_handler,
    contact_handler, contact_page, home_handler, login_handler, login_page, logout_handler,
    place_order_handler, register_handler, register_page,
};
use state::{AppState, SharedState};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/register", get(register_page).post(register_handler))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/add_to_cart", post(add_to_cart_handler))
        .route("/checkout", get(checkout_handler))
        .route("/place_order", post(place_order_handler))
        .route("/admin", get(admin_handler))
        .route("/contact", get(contact_page).post(contact_handler))
        .route("/chat", get(chat_page).post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = SharedState(AppState::new(Config::load()));

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
