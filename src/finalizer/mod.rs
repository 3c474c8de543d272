//! Closes expired auctions and notifies their winners.
//!
//! A batch processes the expired set one auction at a time, in the order the
//! repository returns it. A failed `save` only affects its own auction: the
//! closed value is dropped, no notification goes out, and the batch moves on.
//! A failed expired-auction query or a failed notification ends the batch.

// region:    --- Imports
use crate::auction::{Auction, AuctionId, Bid};
use crate::notifier::{NotifyError, WinnerNotifier};
use crate::repository::{AuctionRepository, RepositoryError};
use thiserror::Error;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Persisted closed; the winner (if any) was notified
    Closed { winning_bid: Option<Bid> },
    /// `save` failed; the auction stays open and nobody was notified
    SaveFailed { reason: String },
    /// Returned by the repository but already closed
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionOutcome {
    pub auction_id: AuctionId,
    pub status: OutcomeStatus,
}

/// Per-auction result of one batch, in processing order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    pub outcomes: Vec<AuctionOutcome>,
}

impl FinalizeReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn closed(&self) -> impl Iterator<Item = &AuctionOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, OutcomeStatus::Closed { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &AuctionOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, OutcomeStatus::SaveFailed { .. }))
    }
}
// endregion: --- Report

// region:    --- Finalizer
#[derive(Debug, Error)]
pub enum FinalizerError {
    #[error("Expired auction query failed: {0}")]
    Query(#[source] RepositoryError),

    /// `auction_id` is persisted closed; `report` holds the auctions handled before it
    #[error("Winner notification failed for auction {auction_id}: {source}")]
    Notify {
        auction_id: AuctionId,
        #[source]
        source: NotifyError,
        report: FinalizeReport,
    },
}

pub struct Finalizer<R, N> {
    repository: R,
    notifier: N,
}

impl<R, N> Finalizer<R, N>
where
    R: AuctionRepository,
    N: WinnerNotifier,
{
    pub fn new(repository: R, notifier: N) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Close every expired auction and notify the winners
    pub async fn finalize_expired_auctions(&self) -> Result<FinalizeReport, FinalizerError> {
        let auctions = self
            .repository
            .list_expired_auctions()
            .await
            .map_err(FinalizerError::Query)?;

        if auctions.is_empty() {
            debug!("{:<12} --> No expired auctions", "Finalizer");
            return Ok(FinalizeReport::default());
        }

        info!(
            "{:<12} --> Finalizing {} expired auctions",
            "Finalizer",
            auctions.len()
        );

        let mut report = FinalizeReport {
            outcomes: Vec::with_capacity(auctions.len()),
        };
        for auction in auctions {
            match self.finalize_auction(auction).await {
                Ok(outcome) => report.outcomes.push(outcome),
                Err((auction_id, source)) => {
                    return Err(FinalizerError::Notify {
                        auction_id,
                        source,
                        report,
                    })
                }
            }
        }

        info!(
            "{:<12} --> Batch done: closed={}, save_failed={}",
            "Finalizer",
            report.closed().count(),
            report.failed().count()
        );
        Ok(report)
    }

    async fn finalize_auction(
        &self,
        mut auction: Auction,
    ) -> Result<AuctionOutcome, (AuctionId, NotifyError)> {
        let auction_id = auction.id;

        let winning_bid = match auction.close() {
            Ok(bid) => bid.cloned(),
            Err(e) => {
                warn!("{:<12} --> Skipping auction {}: {}", "Finalizer", auction_id, e);
                return Ok(AuctionOutcome {
                    auction_id,
                    status: OutcomeStatus::Skipped,
                });
            }
        };

        if let Err(e) = self.repository.save(&auction).await {
            warn!(
                "{:<12} --> Auction {} not closed, save failed: {}",
                "Finalizer", auction_id, e
            );
            return Ok(AuctionOutcome {
                auction_id,
                status: OutcomeStatus::SaveFailed {
                    reason: e.to_string(),
                },
            });
        }

        match &winning_bid {
            Some(bid) => {
                self.notifier
                    .notify_winner(&auction, bid)
                    .await
                    .map_err(|source| (auction_id, source))?;
                info!(
                    "{:<12} --> Auction {} closed, winner {} with {}",
                    "Finalizer", auction_id, bid.bidder.name, bid.value
                );
            }
            None => info!("{:<12} --> Auction {} closed without bids", "Finalizer", auction_id),
        }

        Ok(AuctionOutcome {
            auction_id,
            status: OutcomeStatus::Closed { winning_bid },
        })
    }
}
// endregion: --- Finalizer
