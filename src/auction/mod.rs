pub mod events;
pub mod model;

pub use model::{Auction, AuctionError, AuctionId, Bid, User};
