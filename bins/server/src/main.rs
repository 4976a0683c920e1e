//! Docdrop Server
//!
//! Main entry point for the upload relay service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docdrop_api::{AppState, create_router};
use docdrop_core::{
    SubmissionService,
    submission::{RelaySettings, UploadPolicy},
};
use docdrop_shared::{AppConfig, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "docdrop=debug,docdrop_api=debug,docdrop_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Arc::new(AppConfig::load().context("Failed to load configuration")?);

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    if config.email.is_configured() {
        info!(
            smtp_host = %config.email.smtp_host,
            smtp_port = %config.email.smtp_port,
            "Email service configured"
        );
    } else {
        warn!("Missing EMAIL_USER, EMAIL_PASS or OWNER_EMAIL. Uploads will fail until configured.");
    }

    // Create submission service
    let submissions = SubmissionService::new(
        UploadPolicy::default(),
        RelaySettings::from_config(&config),
        Arc::new(email_service),
    );
    info!(
        staging_dir = %config.upload.staging_dir.display(),
        client_receipt = config.email.send_client_receipt,
        "Upload relay ready"
    );

    // Create application state
    let state = AppState {
        config: Arc::clone(&config),
        submissions: Arc::new(submissions),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
