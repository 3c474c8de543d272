#![allow(dead_code)]
// In-memory collaborators for finalizer tests.
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

use async_trait::async_trait;
use auction_finalizer::auction::{Auction, AuctionId, Bid, User};
use auction_finalizer::notifier::{NotifyError, WinnerNotifier};
use auction_finalizer::repository::{AuctionRepository, RepositoryError};
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

/// Tracing for test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

// region:    --- Fixtures
pub fn value(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).unwrap()
}

pub fn expired_auction(id: AuctionId, description: &str, bids: &[(&str, &str)]) -> Auction {
    let mut auction = Auction::new(
        id,
        description,
        value("500"),
        User::new("Fulano"),
        Utc::now() - Duration::hours(1),
    );
    for (bidder, amount) in bids {
        auction.propose(User::new(*bidder), value(amount)).unwrap();
    }
    auction
}

/// "Celular" starting at 500, bids Beltrano:600 then Ciclano:900
pub fn phone_auction() -> Auction {
    expired_auction(1, "Celular", &[("Beltrano", "600"), ("Ciclano", "900")])
}
// endregion: --- Fixtures

// region:    --- Repository Fake
#[derive(Default)]
pub struct InMemoryAuctionRepository {
    expired: Mutex<Vec<Auction>>,
    saved: Mutex<Vec<Auction>>,
    save_attempts: Mutex<Vec<AuctionId>>,
    failing_saves: HashSet<AuctionId>,
    failing_query: bool,
}

impl InMemoryAuctionRepository {
    pub fn new(expired: Vec<Auction>) -> Self {
        Self {
            expired: Mutex::new(expired),
            ..Default::default()
        }
    }

    pub fn failing_save_for(mut self, auction_id: AuctionId) -> Self {
        self.failing_saves.insert(auction_id);
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.failing_query = true;
        self
    }

    pub fn saved(&self) -> Vec<Auction> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_attempts(&self) -> Vec<AuctionId> {
        self.save_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuctionRepository for InMemoryAuctionRepository {
    async fn list_expired_auctions(&self) -> Result<Vec<Auction>, RepositoryError> {
        if self.failing_query {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.expired.lock().unwrap().clone())
    }

    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError> {
        self.save_attempts.lock().unwrap().push(auction.id);
        if self.failing_saves.contains(&auction.id) {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        // A closed auction is no longer expired-and-open.
        self.expired
            .lock()
            .unwrap()
            .retain(|candidate| candidate.id != auction.id);
        self.saved.lock().unwrap().push(auction.clone());
        Ok(())
    }
}
// endregion: --- Repository Fake

// region:    --- Notifier Fake
#[derive(Default)]
pub struct RecordingNotifier {
    notified: Mutex<Vec<(AuctionId, Bid)>>,
    failing_for: HashSet<AuctionId>,
    delay: Option<StdDuration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, auction_id: AuctionId) -> Self {
        self.failing_for.insert(auction_id);
        self
    }

    /// Slow mail gateway: each notification takes `delay`
    pub fn with_delay(mut self, delay: StdDuration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn notified(&self) -> Vec<(AuctionId, Bid)> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl WinnerNotifier for RecordingNotifier {
    async fn notify_winner(&self, auction: &Auction, winning_bid: &Bid) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_for.contains(&auction.id) {
            return Err(NotifyError::Rejected(format!(
                "mail gateway refused auction {}",
                auction.id
            )));
        }
        self.notified
            .lock()
            .unwrap()
            .push((auction.id, winning_bid.clone()));
        Ok(())
    }
}
// endregion: --- Notifier Fake
