// region:    --- Imports
use auction_finalizer::config::Config;
use auction_finalizer::database::DatabaseManager;
use auction_finalizer::finalizer::Finalizer;
use auction_finalizer::message_broker::KafkaManager;
use auction_finalizer::notifier::KafkaWinnerNotifier;
use auction_finalizer::repository::PostgresAuctionRepository;
use auction_finalizer::scheduler::AuctionScheduler;
use std::sync::Arc;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let db_manager = Arc::new(DatabaseManager::new(&config).await?);
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> Database initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> Database initialized", "Main");

    let kafka_manager = KafkaManager::new(&config)?;
    kafka_manager
        .create_topic(
            &config.notification_topic,
            config.notification_topic_partitions,
            config.notification_topic_replication,
        )
        .await?;

    let finalizer = Arc::new(Finalizer::new(
        PostgresAuctionRepository::new(Arc::clone(&db_manager)),
        KafkaWinnerNotifier::new(kafka_manager.get_producer(), config.notification_topic.clone()),
    ));

    let scheduler = AuctionScheduler::new(finalizer, config.finalize_interval);
    let handle = scheduler.start();
    info!(
        "{:<12} --> Finalizer running every {:?}",
        "Main", config.finalize_interval
    );

    tokio::signal::ctrl_c().await?;
    info!("{:<12} --> Shutting down", "Main");
    handle.stop().await?;
    Ok(())
}
// endregion: --- Main
