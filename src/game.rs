//! Everything needed to simulate rounds of blackjack at a single table: the
//! shoe and its running count, multi-valued hand tracking, strategy-table
//! lookups, the per-seat decision loop and outcome settlement.

pub mod hand;
pub mod participant;
pub mod shoe;
pub mod strategy;
pub mod table;

pub mod prelude {
    pub use crate::game::hand::Hand;
    pub use crate::game::participant::{Outcome, Participant, Role};
    pub use crate::game::shoe::{RankSpec, Rules, Shoe};
    pub use crate::game::strategy::{Action, StrategyRowDef, StrategyTable, StrategyTableDef};
    pub use crate::game::table::Table;
    pub use crate::game::GameError;
}

pub use prelude::*;

use thiserror::Error;

/// The ways a simulated round can fail. Outcome and payout computation are
/// pure and never error; draws and strategy lookups can.
#[derive(Debug, Error)]
pub enum GameError {
    /// The shoe ran dry mid-round. Callers are expected to reshuffle before
    /// depletion; hitting this is a driver bug, not a recoverable state.
    #[error("the shoe is out of cards")]
    ShoeEmpty,
    /// The strategy tables had no cell for a total the game reached. A
    /// missing rule means the profile is incomplete.
    #[error("missing strategy rule (soft: {soft}) for total {total} against dealer {dealer:?}")]
    MissingRule {
        soft: bool,
        total: u8,
        dealer: Option<u8>,
    },
    /// A strategy document failed validation at load.
    #[error("invalid strategy table: {0}")]
    InvalidStrategy(String),
}
