use crate::game::participant::{Outcome, Participant};
use crate::game::shoe::{Rules, Shoe};
use crate::game::strategy::StrategyTable;
use crate::game::GameError;
use std::sync::Arc;

/// One blackjack table: the shoe, the dealer and the seated players. The shoe
/// and its running count are owned here and threaded through every draw of
/// every round; they carry over between rounds until `reshuffle`.
pub struct Table {
    rules: Rules,
    shoe: Shoe,
    dealer: Participant,
    players: Vec<Participant>,
}

impl Table {
    pub fn new(rules: Rules, num_decks: u32) -> Table {
        let shoe = Shoe::new(&rules, num_decks);
        Table::with_shoe(rules, shoe)
    }

    /// Same table with a seeded shoe, for reproducible simulations.
    pub fn with_seed(rules: Rules, num_decks: u32, seed: u64) -> Table {
        let shoe = Shoe::with_seed(&rules, num_decks, seed);
        Table::with_shoe(rules, shoe)
    }

    fn with_shoe(rules: Rules, shoe: Shoe) -> Table {
        Table {
            rules,
            shoe,
            dealer: Participant::dealer(Arc::new(StrategyTable::dealer_standard())),
            players: Vec::new(),
        }
    }

    /// Seats a player with the given strategy profile.
    pub fn add_player(&mut self, strategy: Arc<StrategyTable>) {
        self.players.push(Participant::player(strategy));
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn dealer(&self) -> &Participant {
        &self.dealer
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Participant] {
        &mut self.players
    }

    /// Stakes every seat for the coming round: counting profiles size their
    /// bet from the shoe, everyone else plays the table minimum.
    pub fn place_bets(&mut self) {
        for player in &mut self.players {
            if player.strategy().counting() {
                player.set_bet_from_count(&self.shoe, &self.rules);
            } else {
                player.set_bet(None, &self.rules);
            }
        }
    }

    /// Plays one full round: every player takes a card, the dealer takes its
    /// up card, every player takes a second card; each player then runs its
    /// strategy against the dealer's visible value, the dealer runs its own
    /// strategy last, and every player settles against the dealer's terminal
    /// hand. Returns the per-player outcomes in seat order.
    pub fn play_round(&mut self) -> Result<Vec<Outcome>, GameError> {
        for player in &mut self.players {
            player.draw_from(&mut self.shoe, &self.rules)?;
        }
        self.dealer.draw_from(&mut self.shoe, &self.rules)?;
        for player in &mut self.players {
            player.draw_from(&mut self.shoe, &self.rules)?;
        }

        let dealer_up = self.dealer.value();
        for player in &mut self.players {
            player.play_strategy(&mut self.shoe, &self.rules, Some(dealer_up))?;
        }
        self.dealer.play_strategy(&mut self.shoe, &self.rules, None)?;

        let dealer = &self.dealer;
        let outcomes = self
            .players
            .iter_mut()
            .map(|player| player.settle(dealer))
            .collect();
        self.dealer.reset(false);
        Ok(outcomes)
    }

    /// Refills the shoe and zeroes the running count.
    pub fn reshuffle(&mut self, num_decks: u32) {
        self.shoe.refill(&self.rules, num_decks);
    }
}
