//! docrest server binary
//!
//! Serves the `users` collection over HTTP from the configured document store.

use docrest_server::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    docrest_server::start_server(config).await?;

    Ok(())
}
