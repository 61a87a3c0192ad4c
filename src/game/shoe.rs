use crate::game::GameError;
use lazy_static::lazy_static;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A single card rank as the game sees it: a display symbol, the face value(s)
/// the rank can take (two entries for the Ace) and the weight it contributes to
/// the running count when drawn.
#[derive(Debug, Clone)]
pub struct RankSpec {
    pub symbol: String,
    pub values: Vec<u8>,
    pub count_weight: i32,
}

impl RankSpec {
    pub fn new(symbol: &str, values: &[u8], count_weight: i32) -> RankSpec {
        RankSpec {
            symbol: symbol.to_string(),
            values: values.to_vec(),
            count_weight,
        }
    }
}

/// The table-level constants every other component reads: the rank list, how
/// many copies of each rank one physical deck holds and the table minimum bet.
#[derive(Debug, Clone)]
pub struct Rules {
    pub ranks: Vec<RankSpec>,
    pub rank_copies_per_deck: u32,
    pub min_bet: f32,
}

lazy_static! {
    static ref STANDARD_RULES: Rules = {
        let mut ranks = Vec::new();
        for v in 2u8..=9 {
            // Hi-Lo weights: low cards count up, 7-9 are neutral
            let weight = if v <= 6 { 1 } else { 0 };
            ranks.push(RankSpec::new(&v.to_string(), &[v], weight));
        }
        for symbol in ["10", "J", "Q", "K"] {
            ranks.push(RankSpec::new(symbol, &[10], -1));
        }
        ranks.push(RankSpec::new("A", &[1, 11], -1));
        Rules {
            ranks,
            rank_copies_per_deck: 4,
            min_bet: 5.0,
        }
    };
}

impl Rules {
    /// The standard 13-rank table with Hi-Lo count weights and a $5 minimum.
    pub fn standard() -> Rules {
        STANDARD_RULES.clone()
    }

    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Looks a rank up by its display symbol.
    pub fn rank_index(&self, symbol: &str) -> Option<usize> {
        self.ranks.iter().position(|r| r.symbol == symbol)
    }
}

/// The shared mutable deck state: remaining copies of each rank plus the
/// running count. One `Shoe` is owned by one table and threaded through every
/// draw of every round until it is refilled.
pub struct Shoe {
    counts: Vec<u32>,
    running_count: i32,
    rng: StdRng,
}

impl Shoe {
    pub fn new(rules: &Rules, num_decks: u32) -> Shoe {
        Shoe {
            counts: vec![rules.rank_copies_per_deck * num_decks; rules.rank_count()],
            running_count: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Same as `new` but with a fixed RNG seed, for reproducible simulations.
    pub fn with_seed(rules: &Rules, num_decks: u32, seed: u64) -> Shoe {
        Shoe {
            counts: vec![rules.rank_copies_per_deck * num_decks; rules.rank_count()],
            running_count: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds a shoe in an arbitrary state. The counts vector must line up
    /// with the rank list of the `Rules` the shoe is drawn against.
    pub fn from_counts(counts: Vec<u32>, running_count: i32, seed: u64) -> Shoe {
        Shoe {
            counts,
            running_count,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn total_remaining(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    /// Samples a rank with probability proportional to its remaining count,
    /// removes one copy and applies the rank's count weight. Drawing from an
    /// empty shoe is a caller error; the table must refill before depletion.
    pub fn draw(&mut self, rules: &Rules) -> Result<usize, GameError> {
        let dist = WeightedIndex::new(self.counts.iter().copied())
            .map_err(|_| GameError::ShoeEmpty)?;
        let rank = dist.sample(&mut self.rng);
        self.counts[rank] -= 1;
        self.running_count += rules.ranks[rank].count_weight;
        Ok(rank)
    }

    /// The count-based deck favorability metric used for bet sizing:
    /// `running_count / cards_remaining * copies_per_deck * rank_count`.
    pub fn true_count(&self, rules: &Rules) -> f32 {
        let total = self.total_remaining();
        if total == 0 {
            return 0.0;
        }
        (self.running_count as f32) / (total as f32)
            * (rules.rank_copies_per_deck as f32)
            * (rules.rank_count() as f32)
    }

    /// Restores a full shoe and zeroes the running count.
    pub fn refill(&mut self, rules: &Rules, num_decks: u32) {
        self.counts = vec![rules.rank_copies_per_deck * num_decks; rules.rank_count()];
        self.running_count = 0;
    }
}
