use super::model::{Auction, AuctionId, Bid};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum AuctionEvent {
    // Winner notification, rendered as an email downstream
    AuctionWon {
        auction_id: AuctionId,
        description: String,
        winner: String,
        amount: BigDecimal,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    pub fn auction_won(auction: &Auction, bid: &Bid, timestamp: DateTime<Utc>) -> Self {
        AuctionEvent::AuctionWon {
            auction_id: auction.id,
            description: auction.description.clone(),
            winner: bid.bidder.name.clone(),
            amount: bid.value.clone(),
            timestamp,
        }
    }
}
