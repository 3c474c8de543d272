// region:    --- Imports
use crate::auction::{Auction, AuctionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod postgres;
pub mod queries;

pub use postgres::PostgresAuctionRepository;
// endregion: --- Imports

// region:    --- Repository Trait
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Auction {0} is missing or already closed")]
    Conflict(AuctionId),

    #[error("Stored auction does not map to the domain: {0}")]
    Corrupt(String),
}

/// Auction persistence
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    /// Open auctions whose deadline has passed, in processing order
    async fn list_expired_auctions(&self) -> Result<Vec<Auction>, RepositoryError>;

    /// Persist the closed flag and winning bid
    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<T: AuctionRepository + ?Sized> AuctionRepository for Arc<T> {
    async fn list_expired_auctions(&self) -> Result<Vec<Auction>, RepositoryError> {
        (**self).list_expired_auctions().await
    }

    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError> {
        (**self).save(auction).await
    }
}
// endregion: --- Repository Trait
