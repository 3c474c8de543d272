// region:    --- Imports
use super::{queries, AuctionRepository, RepositoryError};
use crate::auction::{Auction, AuctionId, Bid, User};
use crate::database::DatabaseManager;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Rows
#[derive(Debug, FromRow)]
struct AuctionRow {
    id: i64,
    description: String,
    starting_value: BigDecimal,
    owner_name: String,
    ends_at: DateTime<Utc>,
    closed: bool,
    winning_bid_sequence: Option<i32>,
}

#[derive(Debug, FromRow)]
struct BidRow {
    auction_id: i64,
    sequence: i32,
    bidder_name: String,
    value: BigDecimal,
}

impl AuctionRow {
    fn into_auction(self, bids: Vec<Bid>) -> Result<Auction, RepositoryError> {
        let winning_bid = match self.winning_bid_sequence {
            Some(sequence) => Some(
                bids.iter()
                    .find(|bid| bid.sequence == sequence)
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::Corrupt(format!(
                            "auction {} references unknown winning bid {}",
                            self.id, sequence
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Auction {
            id: self.id,
            description: self.description,
            starting_value: self.starting_value,
            owner: User::new(self.owner_name),
            ends_at: self.ends_at,
            bids,
            closed: self.closed,
            winning_bid,
        })
    }
}

impl From<BidRow> for Bid {
    fn from(row: BidRow) -> Self {
        Bid {
            sequence: row.sequence,
            bidder: User::new(row.bidder_name),
            value: row.value,
        }
    }
}
// endregion: --- Rows

// region:    --- Postgres Repository
pub struct PostgresAuctionRepository {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresAuctionRepository {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl AuctionRepository for PostgresAuctionRepository {
    async fn list_expired_auctions(&self) -> Result<Vec<Auction>, RepositoryError> {
        let now = Utc::now();
        debug!("{:<12} --> Expired auction lookup at {}", "Repository", now);

        let (auction_rows, bid_rows) = self
            .db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let auctions = sqlx::query_as::<_, AuctionRow>(queries::LIST_EXPIRED_AUCTIONS)
                        .bind(now)
                        .fetch_all(&mut **tx)
                        .await?;
                    if auctions.is_empty() {
                        return Ok((auctions, Vec::new()));
                    }

                    let ids: Vec<i64> = auctions.iter().map(|row| row.id).collect();
                    let bids = sqlx::query_as::<_, BidRow>(queries::LIST_BIDS_FOR_AUCTIONS)
                        .bind(ids)
                        .fetch_all(&mut **tx)
                        .await?;
                    Ok::<_, sqlx::Error>((auctions, bids))
                })
            })
            .await?;

        let mut bids_by_auction: HashMap<AuctionId, Vec<Bid>> = HashMap::new();
        for row in bid_rows {
            bids_by_auction
                .entry(row.auction_id)
                .or_default()
                .push(Bid::from(row));
        }

        info!(
            "{:<12} --> Expired auctions found: {}",
            "Repository",
            auction_rows.len()
        );
        auction_rows
            .into_iter()
            .map(|row| {
                let bids = bids_by_auction.remove(&row.id).unwrap_or_default();
                row.into_auction(bids)
            })
            .collect()
    }

    async fn save(&self, auction: &Auction) -> Result<(), RepositoryError> {
        let auction_id = auction.id;
        let closed = auction.closed;
        let winning_bid_sequence = auction.winning_bid.as_ref().map(|bid| bid.sequence);

        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::CLOSE_AUCTION)
                        .bind(closed)
                        .bind(winning_bid_sequence)
                        .bind(auction_id)
                        .execute(&mut **tx)
                        .await?;
                    if result.rows_affected() == 0 {
                        return Err(RepositoryError::Conflict(auction_id));
                    }
                    Ok(())
                })
            })
            .await?;

        debug!("{:<12} --> Auction {} saved", "Repository", auction_id);
        Ok(())
    }
}
// endregion: --- Postgres Repository
