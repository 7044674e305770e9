mod catalog;
mod cli;
mod config;
mod errors;
mod graph;
mod ledger;
mod models;
mod queue;
mod storefront;

use catalog::Catalog;
use cli::Menu;
use config::Config;
use std::io;
use storefront::StorefrontService;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let catalog = Catalog::default();

    tracing::info!(
        "{} starting: {} bundles, {} recommendations per bundle, ledger policy {:?}",
        config.store_name,
        catalog.len(),
        config.recommendation_count,
        config.ledger_policy
    );

    let mut store = StorefrontService::new(catalog, config.ledger_policy, config.recommendation_count);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&mut store, &config.store_name, stdin.lock(), stdout.lock()).run()?;

    tracing::info!(
        "Shutting down with {} unprocessed orders, {} ledger entries",
        store.queue().len(),
        store.ledger().len()
    );
    Ok(())
}
