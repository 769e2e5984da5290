//! Batch entry point.
//!
//! Loads configuration from the environment, wires the adapters and runs
//! one reconciliation batch over the unprocessed documents.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use extraction_audit::adapters::{FsObjectCatalog, PostgresAuditStore};
use extraction_audit::application::{RunBatchCommand, RunBatchHandler};
use extraction_audit::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.runner.log_level))
        .init();
    info!("extraction-audit v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    let catalog = Arc::new(FsObjectCatalog::new(&config.catalog.root));
    let store = Arc::new(PostgresAuditStore::new(
        pool.clone(),
        config.store.summary_table.clone(),
        config.store.ledger_table.clone(),
    ));

    let handler = RunBatchHandler::new(catalog, store);
    let report = handler
        .handle(RunBatchCommand {
            search_prefix: config.catalog.search_prefix.clone(),
            data_prefix: config.catalog.data_prefix.clone(),
        })
        .await?;

    info!(
        run_id = %report.run_id,
        processed = report.processed_count(),
        skipped = report.skipped_count(),
        "batch finished"
    );

    let failed = !report.fully_persisted();
    if let Some(write_error) = &report.write_error {
        // The summaries still exist in memory; dump them so nothing is lost.
        error!(
            "summary write failed ({}), retained summaries follow:\n{}",
            write_error,
            serde_json::to_string_pretty(&report.summaries)?
        );
    }
    for (document_id, write_error) in &report.ledger_write_errors {
        error!(document_id = %document_id, "ledger write failed: {write_error}");
    }

    pool.close().await;

    if failed {
        return Err("batch completed with persistence failures".into());
    }
    Ok(())
}
