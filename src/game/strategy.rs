use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The three actions a strategy table can prescribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
}

impl Action {
    /// Parses the one-letter cell code used by strategy documents.
    pub fn from_code(code: &str) -> Result<Action, GameError> {
        match code {
            "H" => Ok(Action::Hit),
            "S" => Ok(Action::Stand),
            "D" => Ok(Action::Double),
            _ => Err(GameError::InvalidStrategy(format!(
                "unknown action code {:?}",
                code
            ))),
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::Double => "D",
        }
    }
}

/// One row of a strategy document: a hand total, an optional default-column
/// cell and the cells keyed by dealer up value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRowDef {
    pub total: u8,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub by_dealer: HashMap<u8, String>,
}

/// The serde form of a strategy profile: one table for soft totals, one for
/// hard totals, plus the flag selecting count-based bet sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyTableDef {
    #[serde(default)]
    pub counting: bool,
    pub soft: Vec<StrategyRowDef>,
    pub hard: Vec<StrategyRowDef>,
}

type Surface = HashMap<(u8, Option<u8>), Action>;

/// A validated strategy profile. Lookups are keyed by hand total and dealer up
/// value; `None` selects the default column used when no dealer reference is
/// supplied (the dealer playing its own strategy). A total/dealer pair the
/// tables never defined is a configuration error, not a silent default.
pub struct StrategyTable {
    counting: bool,
    soft: Surface,
    hard: Surface,
}

impl StrategyTable {
    /// Validates a strategy document into a typed table. Unknown cell codes
    /// and duplicate cells are rejected here rather than at play time.
    pub fn from_def(def: StrategyTableDef) -> Result<StrategyTable, GameError> {
        let mut table = StrategyTable {
            counting: def.counting,
            soft: HashMap::new(),
            hard: HashMap::new(),
        };
        Self::load_surface(def.soft, "soft", &mut table.soft)?;
        Self::load_surface(def.hard, "hard", &mut table.hard)?;
        Ok(table)
    }

    /// Convenience wrapper for profiles supplied as JSON documents.
    pub fn from_json(doc: &str) -> Result<StrategyTable, GameError> {
        let def: StrategyTableDef =
            serde_json::from_str(doc).map_err(|e| GameError::InvalidStrategy(e.to_string()))?;
        StrategyTable::from_def(def)
    }

    fn load_surface(
        rows: Vec<StrategyRowDef>,
        name: &str,
        out: &mut Surface,
    ) -> Result<(), GameError> {
        for row in rows {
            if let Some(code) = &row.default {
                if out
                    .insert((row.total, None), Action::from_code(code)?)
                    .is_some()
                {
                    return Err(GameError::InvalidStrategy(format!(
                        "duplicate {} default cell for total {}",
                        name, row.total
                    )));
                }
            }
            for (up, code) in &row.by_dealer {
                if out
                    .insert((row.total, Some(*up)), Action::from_code(code)?)
                    .is_some()
                {
                    return Err(GameError::InvalidStrategy(format!(
                        "duplicate {} cell for total {} against dealer {}",
                        name, row.total, up
                    )));
                }
            }
        }
        Ok(())
    }

    /// The built-in dealer profile: default column only, hit to hard 17 / soft
    /// 18, stand from there up to and including the 22 standoff total.
    pub fn dealer_standard() -> StrategyTable {
        let mut hard = HashMap::new();
        for total in 2u8..=22 {
            let action = if total < 17 { Action::Hit } else { Action::Stand };
            hard.insert((total, None), action);
        }
        let mut soft = HashMap::new();
        for total in 11u8..=22 {
            let action = if total < 18 { Action::Hit } else { Action::Stand };
            soft.insert((total, None), action);
        }
        StrategyTable {
            counting: false,
            soft,
            hard,
        }
    }

    /// The built-in player profile, the hit/stand/double slice of basic
    /// strategy keyed by dealer up value (11 is the Ace column).
    pub fn basic(counting: bool) -> StrategyTable {
        let mut hard = HashMap::new();
        for total in 4u8..=21 {
            for up in 2u8..=11 {
                let action = match total {
                    9 => match up {
                        3..=6 => Action::Double,
                        _ => Action::Hit,
                    },
                    10 => match up {
                        2..=9 => Action::Double,
                        _ => Action::Hit,
                    },
                    11 => Action::Double,
                    12 => match up {
                        4..=6 => Action::Stand,
                        _ => Action::Hit,
                    },
                    13..=16 => match up {
                        2..=6 => Action::Stand,
                        _ => Action::Hit,
                    },
                    17..=21 => Action::Stand,
                    _ => Action::Hit,
                };
                hard.insert((total, Some(up)), action);
            }
        }

        let mut soft = HashMap::new();
        for total in 12u8..=21 {
            for up in 2u8..=11 {
                let action = match total {
                    12..=17 => Action::Hit,
                    18 => match up {
                        2..=6 => Action::Double,
                        7 | 8 => Action::Stand,
                        _ => Action::Hit,
                    },
                    19 => match up {
                        6 => Action::Double,
                        _ => Action::Stand,
                    },
                    _ => Action::Stand,
                };
                soft.insert((total, Some(up)), action);
            }
        }

        StrategyTable {
            counting,
            soft,
            hard,
        }
    }

    /// Whether this profile sizes its bets from the running count.
    pub fn counting(&self) -> bool {
        self.counting
    }

    /// Resolves the action for the current hand. `is_soft` selects the soft
    /// table (the hand still has an unresolved Ace); `dealer_up` of `None`
    /// selects the default column.
    pub fn lookup(
        &self,
        is_soft: bool,
        total: u8,
        dealer_up: Option<u8>,
    ) -> Result<Action, GameError> {
        let surface = if is_soft { &self.soft } else { &self.hard };
        surface
            .get(&(total, dealer_up))
            .copied()
            .ok_or(GameError::MissingRule {
                soft: is_soft,
                total,
                dealer: dealer_up,
            })
    }
}
