use std::collections::BTreeSet;

/// A participant's cards for one round, tracked as the set of totals the hand
/// could be worth. Multi-valued ranks (the Ace) fan out into several candidate
/// totals; totals that would bust are dropped as they appear, so an empty set
/// means the hand is bust.
#[derive(Debug, Clone)]
pub struct Hand {
    cards: Vec<usize>,
    possible: BTreeSet<u8>,
    bust: bool,
}

impl Hand {
    pub fn new() -> Hand {
        let mut possible = BTreeSet::new();
        possible.insert(0);
        Hand {
            cards: Vec::new(),
            possible,
            bust: false,
        }
    }

    /// Rank indices drawn so far, in draw order.
    pub fn cards(&self) -> &[usize] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True while the hand has an unresolved Ace, i.e. more than one total is
    /// still live. This is what selects the soft strategy table.
    pub fn is_soft(&self) -> bool {
        self.possible.len() > 1
    }

    pub fn is_bust(&self) -> bool {
        self.bust
    }

    /// The best surviving total, or 0 once the hand is bust.
    pub fn value(&self) -> u8 {
        self.possible.iter().next_back().copied().unwrap_or(0)
    }

    pub fn possible_totals(&self) -> &BTreeSet<u8> {
        &self.possible
    }

    /// Folds one drawn card into the hand. Every combination of a live total
    /// and a candidate face value is kept iff it stays within
    /// `21 + standoff_bonus` (the bonus is 1 for the dealer, letting exactly 22
    /// survive as the standoff total). An empty result marks the hand bust.
    pub fn apply_draw(&mut self, rank: usize, values: &[u8], standoff_bonus: u8) {
        let limit = 21 + standoff_bonus;
        let mut next = BTreeSet::new();
        for total in &self.possible {
            for value in values {
                let candidate = total + value;
                if candidate <= limit {
                    next.insert(candidate);
                }
            }
        }
        if next.is_empty() {
            self.bust = true;
        }
        self.possible = next;
        self.cards.push(rank);
    }

    pub fn reset(&mut self) {
        self.cards.clear();
        self.possible.clear();
        self.possible.insert(0);
        self.bust = false;
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand::new()
    }
}
