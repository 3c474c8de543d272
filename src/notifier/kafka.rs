use super::{NotifyError, WinnerNotifier};
use crate::auction::events::AuctionEvent;
use crate::auction::{Auction, Bid};
use crate::message_broker::KafkaProducer;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Publishes `AuctionWon` events; the mail service consumes the topic
pub struct KafkaWinnerNotifier {
    producer: Arc<KafkaProducer>,
    topic: String,
}

impl KafkaWinnerNotifier {
    pub fn new(producer: Arc<KafkaProducer>, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl WinnerNotifier for KafkaWinnerNotifier {
    async fn notify_winner(&self, auction: &Auction, winning_bid: &Bid) -> Result<(), NotifyError> {
        let event = AuctionEvent::auction_won(auction, winning_bid, Utc::now());
        let payload = serde_json::to_string(&event)?;

        self.producer
            .send_message(&self.topic, &auction.id.to_string(), &payload)
            .await?;

        info!(
            "{:<12} --> Winner notified: auction={}, winner={}",
            "Notifier", auction.id, winning_bid.bidder.name
        );
        Ok(())
    }
}
