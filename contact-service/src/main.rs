mod config;
mod dto;
mod handler;
mod relay;
mod service;

use lettre::message::Mailbox;

use std::sync::Arc;

use relay::SmtpRelay;
use service::ContactService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt().init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load contact service config: {e}");
        panic!("failed to locate or load config file: {e}");
    });
    tracing::info!("Successfully loaded contact service config");
    tracing::debug!("Config: {:?}", cfg);

    let sender: Mailbox = cfg
        .sender
        .parse()
        .unwrap_or_else(|e| panic!("invalid sender address '{}': {e}", cfg.sender));
    let recipient: Mailbox = cfg
        .recipient
        .parse()
        .unwrap_or_else(|e| panic!("invalid recipient address '{}': {e}", cfg.recipient));

    // Setup relay
    let relay = SmtpRelay::new(&cfg).unwrap_or_else(|e| {
        tracing::error!("Failed to configure SMTP relay '{}': {e}", cfg.smtp_relay);
        panic!("failed to configure SMTP relay: {e}");
    });

    // Setup service
    let service = ContactService::new(Arc::new(relay), sender, recipient);
    let router = handler::router(Arc::new(service));

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().expect("Failed to read bound address");

    tracing::info!("Contact service starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
