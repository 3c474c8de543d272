/// Open auctions past their deadline
pub const LIST_EXPIRED_AUCTIONS: &str = r#"
    SELECT id, description, starting_value, owner_name, ends_at, closed, winning_bid_sequence
    FROM auctions
    WHERE closed = FALSE AND ends_at <= $1
    ORDER BY ends_at, id
"#;

/// Bids of several auctions, in submission order
pub const LIST_BIDS_FOR_AUCTIONS: &str = r#"
    SELECT auction_id, sequence, bidder_name, value
    FROM bids
    WHERE auction_id = ANY($1)
    ORDER BY auction_id, sequence
"#;

/// Close an auction that is still open
pub const CLOSE_AUCTION: &str =
    "UPDATE auctions SET closed = $1, winning_bid_sequence = $2 WHERE id = $3 AND closed = FALSE";
