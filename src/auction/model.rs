use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AuctionId = i64;

// region:    --- User
/// Auction owner or bidder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
// endregion: --- User

// region:    --- Bid
/// A value proposed by a user. `sequence` is the submission position inside the auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub sequence: i32,
    pub bidder: User,
    pub value: BigDecimal,
}
// endregion: --- Bid

// region:    --- Auction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("Auction already closed: {0}")]
    AlreadyClosed(AuctionId),

    #[error("Owner cannot bid on own auction: {0}")]
    OwnerCannotBid(AuctionId),

    #[error("Bid value must be positive: {0}")]
    NonPositiveValue(BigDecimal),

    #[error("Auction {0} cannot take more bids")]
    TooManyBids(AuctionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub description: String,
    pub starting_value: BigDecimal,
    pub owner: User,
    pub ends_at: DateTime<Utc>,
    pub bids: Vec<Bid>,
    pub closed: bool,
    pub winning_bid: Option<Bid>,
}

impl Auction {
    /// Open auction without bids
    pub fn new(
        id: AuctionId,
        description: impl Into<String>,
        starting_value: BigDecimal,
        owner: User,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            starting_value,
            owner,
            ends_at,
            bids: Vec::new(),
            closed: false,
            winning_bid: None,
        }
    }

    /// Append a bid in submission order and return its sequence
    pub fn propose(&mut self, bidder: User, value: BigDecimal) -> Result<i32, AuctionError> {
        if self.closed {
            return Err(AuctionError::AlreadyClosed(self.id));
        }
        if bidder == self.owner {
            return Err(AuctionError::OwnerCannotBid(self.id));
        }
        if value <= BigDecimal::zero() {
            return Err(AuctionError::NonPositiveValue(value));
        }

        let sequence = next_sequence(self.bids.len()).ok_or(AuctionError::TooManyBids(self.id))?;
        self.bids.push(Bid {
            sequence,
            bidder,
            value,
        });
        Ok(sequence)
    }

    /// Highest bid so far. Equal values resolve to the earliest submission.
    pub fn highest_bid(&self) -> Option<&Bid> {
        // Iterator::max_by would keep the last of equal elements.
        self.bids.iter().fold(None, |best, bid| match best {
            Some(current) if current.value >= bid.value => Some(current),
            _ => Some(bid),
        })
    }

    /// Close the auction and fix its winning bid. `None` when nobody bid.
    pub fn close(&mut self) -> Result<Option<&Bid>, AuctionError> {
        if self.closed {
            return Err(AuctionError::AlreadyClosed(self.id));
        }
        self.winning_bid = self.highest_bid().cloned();
        self.closed = true;
        Ok(self.winning_bid.as_ref())
    }
}
// endregion: --- Auction

/// Sequence of the bid appended after `bid_count` bids; `None` past `i32::MAX`
fn next_sequence(bid_count: usize) -> Option<i32> {
    i32::try_from(bid_count).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn value(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    fn phone_auction() -> Auction {
        Auction::new(1, "Celular", value("500"), User::new("Fulano"), Utc::now())
    }

    #[test]
    fn highest_bid_is_the_maximum_value() {
        let mut auction = phone_auction();
        auction.propose(User::new("Beltrano"), value("600")).unwrap();
        auction.propose(User::new("Ciclano"), value("900")).unwrap();
        auction.propose(User::new("Beltrano"), value("750.50")).unwrap();

        let highest = auction.highest_bid().unwrap();
        assert_eq!(highest.value, value("900"));
        assert_eq!(highest.bidder, User::new("Ciclano"));
    }

    #[test]
    fn equal_values_resolve_to_earliest_bid() {
        let mut auction = phone_auction();
        auction.propose(User::new("Beltrano"), value("900")).unwrap();
        auction.propose(User::new("Ciclano"), value("900.00")).unwrap();

        let highest = auction.highest_bid().unwrap();
        assert_eq!(highest.sequence, 0);
        assert_eq!(highest.bidder, User::new("Beltrano"));
    }

    #[test]
    fn no_bids_means_no_highest_bid() {
        assert!(phone_auction().highest_bid().is_none());
    }

    #[test]
    fn close_sets_flag_and_winner() {
        let mut auction = phone_auction();
        auction.propose(User::new("Beltrano"), value("600")).unwrap();
        auction.propose(User::new("Ciclano"), value("900")).unwrap();

        let winner = auction.close().unwrap().cloned();
        assert!(auction.closed);
        assert_eq!(winner, auction.winning_bid);
        assert_eq!(auction.winning_bid.unwrap().value, value("900"));
    }

    #[test]
    fn close_without_bids_has_no_winner() {
        let mut auction = phone_auction();
        assert_eq!(auction.close().unwrap(), None);
        assert!(auction.closed);
        assert!(auction.winning_bid.is_none());
    }

    #[test]
    fn closed_auction_cannot_close_again_or_take_bids() {
        let mut auction = phone_auction();
        auction.propose(User::new("Beltrano"), value("600")).unwrap();
        auction.close().unwrap();

        assert_eq!(auction.close(), Err(AuctionError::AlreadyClosed(1)));
        assert_eq!(
            auction.propose(User::new("Ciclano"), value("900")).unwrap_err(),
            AuctionError::AlreadyClosed(1)
        );
        assert_eq!(auction.winning_bid.unwrap().value, value("600"));
    }

    #[test]
    fn owner_cannot_bid() {
        let mut auction = phone_auction();
        let err = auction.propose(User::new("Fulano"), value("600")).unwrap_err();
        assert_eq!(err, AuctionError::OwnerCannotBid(1));
        assert!(auction.bids.is_empty());
    }

    #[test]
    fn non_positive_bid_is_rejected() {
        let mut auction = phone_auction();
        assert!(auction.propose(User::new("Beltrano"), value("0")).is_err());
        assert!(auction.propose(User::new("Beltrano"), value("-1")).is_err());
    }

    #[test]
    fn sequence_follows_submission_order() {
        let mut auction = phone_auction();
        assert_eq!(auction.propose(User::new("Beltrano"), value("600")), Ok(0));
        assert_eq!(auction.propose(User::new("Ciclano"), value("900")), Ok(1));
        let sequences: Vec<i32> = auction.bids.iter().map(|bid| bid.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn sequence_stops_at_i32_max() {
        assert_eq!(next_sequence(0), Some(0));
        assert_eq!(next_sequence(i32::MAX as usize), Some(i32::MAX));
        assert_eq!(next_sequence(i32::MAX as usize + 1), None);
    }
}
