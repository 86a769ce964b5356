//! Example: verifying TrueSign credentials
//!
//! Loads configuration (environment first, then `truesign.{json,toml}`),
//! authenticates, and lists the users and envelopes visible to the client.
//!
//! ```bash
//! export TRUESIGN_CLIENT_ID=...
//! export TRUESIGN_CLIENT_SECRET=...
//! RUST_LOG=truesign_infra=debug cargo run -p truesign-infra --example connection_check
//! ```

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use truesign_infra::{config, TrueSignClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::load().context("loading TrueSign configuration")?;
    let client = TrueSignClient::from_config(&config.api).context("building client")?;

    let token = client.authenticate().await.context("authenticating")?;
    info!(base_url = %client.base_url(), expires_utc = ?token.expires_utc, "authenticated");

    let users = client.list_users().await.context("listing users")?;
    for user in &users {
        info!(email = %user.email, name = %user.name, "user");
    }

    let envelopes = client.list_envelopes().await.context("listing envelopes")?;
    for envelope in envelopes.iter().take(10) {
        info!(id = %envelope.id, status = %envelope.status, title = %envelope.content.title, "envelope");
    }
    info!(users = users.len(), envelopes = envelopes.len(), "connection check complete");

    Ok(())
}
