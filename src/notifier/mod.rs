// region:    --- Imports
use crate::auction::{Auction, Bid};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod kafka;

pub use kafka::KafkaWinnerNotifier;
// endregion: --- Imports

// region:    --- Notifier Trait
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Tells the winning bidder they won
#[async_trait]
pub trait WinnerNotifier: Send + Sync {
    async fn notify_winner(&self, auction: &Auction, winning_bid: &Bid) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: WinnerNotifier + ?Sized> WinnerNotifier for Arc<T> {
    async fn notify_winner(&self, auction: &Auction, winning_bid: &Bid) -> Result<(), NotifyError> {
        (**self).notify_winner(auction, winning_bid).await
    }
}
// endregion: --- Notifier Trait
