use crate::game::hand::Hand;
use crate::game::shoe::{Rules, Shoe};
use crate::game::strategy::{Action, StrategyTable};
use crate::game::GameError;
use std::sync::Arc;

/// Who the seat belongs to. The dealer gets the 22 standoff bonus in the bust
/// check and plays the default strategy column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dealer,
    Player,
}

impl Role {
    pub fn standoff_bonus(&self) -> u8 {
        match self {
            Role::Dealer => 1,
            Role::Player => 0,
        }
    }
}

/// How one settled hand came out for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Push,
    Blackjack,
}

impl Outcome {
    /// The winnings for a hand staked at `bet`. Blackjack pays 3:2.
    pub fn payout(&self, bet: f32) -> f32 {
        match self {
            Outcome::Win => bet,
            Outcome::Loss => -bet,
            Outcome::Push => 0.0,
            Outcome::Blackjack => bet * 1.5,
        }
    }
}

/// One seat at the table: a hand, the bet staked on it, the strategy profile
/// that plays it and the per-round history of terminal values and winnings.
/// Round state resets after settlement; the history persists until an explicit
/// full reset.
pub struct Participant {
    role: Role,
    pub hand: Hand,
    bet: f32,
    active: bool,
    strategy: Arc<StrategyTable>,
    pub values_log: Vec<u8>,
    pub winnings_log: Vec<f32>,
}

impl Participant {
    fn new(role: Role, strategy: Arc<StrategyTable>) -> Participant {
        Participant {
            role,
            hand: Hand::new(),
            bet: 0.0,
            active: true,
            strategy,
            values_log: Vec::new(),
            winnings_log: Vec::new(),
        }
    }

    pub fn dealer(strategy: Arc<StrategyTable>) -> Participant {
        Participant::new(Role::Dealer, strategy)
    }

    pub fn player(strategy: Arc<StrategyTable>) -> Participant {
        Participant::new(Role::Player, strategy)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn value(&self) -> u8 {
        self.hand.value()
    }

    pub fn is_bust(&self) -> bool {
        self.hand.is_bust()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bet(&self) -> f32 {
        self.bet
    }

    pub fn strategy(&self) -> &StrategyTable {
        &self.strategy
    }

    /// Stakes a flat bet; `None` means the table minimum.
    pub fn set_bet(&mut self, bet: Option<f32>, rules: &Rules) {
        self.bet = bet.unwrap_or(rules.min_bet);
    }

    /// Sizes the bet from deck favorability: `(true_count - 1) * min_bet`,
    /// floored at zero. Anything below the table minimum sits the round out
    /// with a zero stake.
    pub fn set_bet_from_count(&mut self, shoe: &Shoe, rules: &Rules) {
        let true_count = shoe.true_count(rules);
        let bet_value = ((true_count - 1.0) * rules.min_bet).max(0.0);
        if bet_value < rules.min_bet {
            self.set_bet(Some(0.0), rules);
        } else {
            self.set_bet(Some(bet_value), rules);
        }
    }

    /// Draws one card from the shoe into the hand.
    pub fn draw_from(&mut self, shoe: &mut Shoe, rules: &Rules) -> Result<(), GameError> {
        let rank = shoe.draw(rules)?;
        self.hand
            .apply_draw(rank, &rules.ranks[rank].values, self.role.standoff_bonus());
        Ok(())
    }

    /// The doubling draw: bet doubles, the seat goes inactive and takes
    /// exactly this one card.
    fn draw_doubling(&mut self, shoe: &mut Shoe, rules: &Rules) -> Result<(), GameError> {
        self.draw_from(shoe, rules)?;
        self.bet *= 2.0;
        self.active = false;
        Ok(())
    }

    /// Runs the strategy loop for this seat: look the current total up, then
    /// hit, double or stand, until the hand stands, busts or goes inactive.
    /// `dealer_up` is the dealer's visible value; the dealer itself passes
    /// `None` and plays the default column.
    pub fn play_strategy(
        &mut self,
        shoe: &mut Shoe,
        rules: &Rules,
        dealer_up: Option<u8>,
    ) -> Result<(), GameError> {
        while self.active && !self.hand.is_bust() {
            let action = self
                .strategy
                .lookup(self.hand.is_soft(), self.hand.value(), dealer_up)?;
            match action {
                Action::Stand => break,
                Action::Hit => self.draw_from(shoe, rules)?,
                Action::Double => self.draw_doubling(shoe, rules)?,
            }
        }
        Ok(())
    }

    /// Scores this seat against the dealer's terminal hand, appends the
    /// terminal value and winnings to the history and clears the round state.
    pub fn settle(&mut self, dealer: &Participant) -> Outcome {
        let outcome = self.resolve(dealer);
        self.values_log.push(self.hand.value());
        self.winnings_log.push(outcome.payout(self.bet));
        self.reset(false);
        outcome
    }

    /// Outcome precedence: bust checks, then the blackjack / 21 / five-card
    /// wins, then the dealer-22 standoff (which forces a push no matter what),
    /// and only when none of those decided the hand, the numeric comparison.
    fn resolve(&self, dealer: &Participant) -> Outcome {
        let mut outcome = Outcome::Push;
        let mut decided = false;

        if self.hand.is_bust() {
            outcome = Outcome::Loss;
            decided = true;
        } else if dealer.hand.is_bust() {
            outcome = Outcome::Win;
            decided = true;
        }

        if !self.hand.is_bust() {
            if self.hand.len() == 2 && self.value() == 21 {
                outcome = Outcome::Blackjack;
                decided = true;
            } else if self.value() == 21 || self.hand.len() >= 5 {
                outcome = Outcome::Win;
                decided = true;
            }
        }

        if dealer.value() == 22 {
            return Outcome::Push;
        }
        if decided {
            return outcome;
        }

        if dealer.value() > self.value() {
            Outcome::Loss
        } else if dealer.value() < self.value() {
            Outcome::Win
        } else {
            Outcome::Push
        }
    }

    /// Clears the round state. With `clear_logs` the history goes too,
    /// returning the seat to a freshly created one.
    pub fn reset(&mut self, clear_logs: bool) {
        self.hand.reset();
        self.bet = 0.0;
        self.active = true;
        if clear_logs {
            self.values_log.clear();
            self.winnings_log.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Rules {
        Rules::standard()
    }

    fn player() -> Participant {
        Participant::player(Arc::new(StrategyTable::basic(false)))
    }

    fn dealer() -> Participant {
        Participant::dealer(Arc::new(StrategyTable::dealer_standard()))
    }

    fn deal(p: &mut Participant, rules: &Rules, symbols: &[&str]) {
        for s in symbols {
            let rank = rules.rank_index(s).unwrap();
            let values = rules.ranks[rank].values.clone();
            p.hand.apply_draw(rank, &values, p.role().standoff_bonus());
        }
    }

    #[test]
    fn blackjack_beats_a_dealer_twenty_at_three_to_two() {
        let rules = rules();
        let mut p = player();
        let mut d = dealer();
        deal(&mut p, &rules, &["A", "10"]);
        deal(&mut d, &rules, &["10", "Q"]);
        p.set_bet(Some(10.0), &rules);
        assert_eq!(p.settle(&d), Outcome::Blackjack);
        assert_eq!(p.winnings_log, vec![15.0]);
        assert_eq!(p.values_log, vec![21]);
    }

    #[test]
    fn a_three_card_twenty_one_pays_even_money() {
        let rules = rules();
        let mut p = player();
        let mut d = dealer();
        deal(&mut p, &rules, &["7", "7", "7"]);
        deal(&mut d, &rules, &["10", "Q"]);
        p.set_bet(Some(10.0), &rules);
        assert_eq!(p.settle(&d), Outcome::Win);
        assert_eq!(p.winnings_log, vec![10.0]);
    }

    #[test]
    fn five_cards_win_regardless_of_the_dealer() {
        let rules = rules();
        let mut p = player();
        let mut d = dealer();
        deal(&mut p, &rules, &["2", "3", "2", "4", "5"]);
        deal(&mut d, &rules, &["10", "Q"]);
        p.set_bet(Some(5.0), &rules);
        assert_eq!(p.value(), 16);
        assert_eq!(p.settle(&d), Outcome::Win);
        assert_eq!(p.winnings_log, vec![5.0]);
    }

    #[test]
    fn dealer_twenty_two_forces_a_push() {
        let rules = rules();
        let mut d = dealer();
        deal(&mut d, &rules, &["10", "Q", "2"]);
        assert!(!d.is_bust());
        assert_eq!(d.value(), 22);

        let mut p = player();
        deal(&mut p, &rules, &["10", "Q"]);
        p.set_bet(Some(10.0), &rules);
        assert_eq!(p.settle(&d), Outcome::Push);
        assert_eq!(p.winnings_log, vec![0.0]);

        // even a busted player stands off against a dealer 22
        let mut busted = player();
        deal(&mut busted, &rules, &["10", "Q", "5"]);
        assert!(busted.is_bust());
        busted.set_bet(Some(10.0), &rules);
        assert_eq!(busted.settle(&d), Outcome::Push);
    }

    #[test]
    fn player_bust_loses_and_dealer_bust_wins() {
        let rules = rules();
        let mut d = dealer();
        deal(&mut d, &rules, &["9", "9"]);

        let mut p = player();
        deal(&mut p, &rules, &["10", "Q", "5"]);
        p.set_bet(Some(10.0), &rules);
        assert_eq!(p.settle(&d), Outcome::Loss);
        assert_eq!(p.winnings_log, vec![-10.0]);
        assert_eq!(p.values_log, vec![0]);

        let mut busted_dealer = dealer();
        deal(&mut busted_dealer, &rules, &["10", "Q", "5"]);
        assert!(busted_dealer.is_bust());
        let mut p2 = player();
        deal(&mut p2, &rules, &["10", "8"]);
        p2.set_bet(Some(10.0), &rules);
        assert_eq!(p2.settle(&busted_dealer), Outcome::Win);
    }

    #[test]
    fn settlement_resets_the_round_but_keeps_the_history() {
        let rules = rules();
        let mut p = player();
        let mut d = dealer();
        deal(&mut p, &rules, &["10", "9"]);
        deal(&mut d, &rules, &["10", "Q"]);
        p.set_bet(Some(5.0), &rules);
        p.settle(&d);

        assert!(p.hand.is_empty());
        assert_eq!(p.bet(), 0.0);
        assert!(p.is_active());
        assert_eq!(p.values_log, vec![19]);
        assert_eq!(p.winnings_log, vec![-5.0]);

        p.reset(true);
        assert!(p.values_log.is_empty());
        assert!(p.winnings_log.is_empty());
    }

    #[test]
    fn doubling_takes_one_card_and_doubles_the_stake() {
        let rules = rules();
        let mut p = player();
        deal(&mut p, &rules, &["5", "6"]);
        p.set_bet(Some(5.0), &rules);

        // only fives left, so the doubling draw is deterministic
        let mut counts = vec![0; rules.rank_count()];
        counts[rules.rank_index("5").unwrap()] = 4;
        let mut shoe = Shoe::from_counts(counts, 0, 11);

        p.play_strategy(&mut shoe, &rules, Some(6)).unwrap();
        assert_eq!(p.bet(), 10.0);
        assert!(!p.is_active());
        assert_eq!(p.hand.len(), 3);
        assert_eq!(p.value(), 16);
    }

    #[test]
    fn a_standing_total_never_draws() {
        let rules = rules();
        let mut p = player();
        deal(&mut p, &rules, &["10", "Q"]);
        let mut shoe = Shoe::with_seed(&rules, 1, 3);
        let before = shoe.total_remaining();
        p.play_strategy(&mut shoe, &rules, Some(6)).unwrap();
        assert_eq!(shoe.total_remaining(), before);
        assert_eq!(p.hand.len(), 2);
    }

    #[test]
    fn dealer_draws_to_seventeen_on_the_default_column() {
        let rules = rules();
        let mut d = dealer();
        let mut counts = vec![0; rules.rank_count()];
        counts[rules.rank_index("10").unwrap()] = 6;
        let mut shoe = Shoe::from_counts(counts, 0, 5);

        d.draw_from(&mut shoe, &rules).unwrap();
        assert_eq!(d.value(), 10);
        d.play_strategy(&mut shoe, &rules, None).unwrap();
        assert_eq!(d.value(), 20);
        assert_eq!(d.hand.len(), 2);
    }

    #[test]
    fn a_single_rank_shoe_draws_deterministically() {
        let rules = rules();
        let mut counts = vec![0; rules.rank_count()];
        counts[rules.rank_index("10").unwrap()] = 5;
        let mut shoe = Shoe::from_counts(counts, 0, 1);

        let mut p = player();
        p.draw_from(&mut shoe, &rules).unwrap();
        p.draw_from(&mut shoe, &rules).unwrap();
        assert_eq!(
            p.hand
                .possible_totals()
                .iter()
                .copied()
                .collect::<Vec<u8>>(),
            vec![20]
        );
        assert!(!p.is_bust());
        assert_eq!(shoe.total_remaining(), 3);
    }

    #[test]
    fn counting_bets_follow_the_true_count() {
        // 13 ranks, 52 copies per deck, running count 8, 100 cards left:
        // true count 54.08, bet (54.08 - 1) * 5 = 265.40
        let ranks = (0..13)
            .map(|i| crate::game::shoe::RankSpec::new(&format!("r{}", i), &[2], 0))
            .collect::<Vec<crate::game::shoe::RankSpec>>();
        let rules = Rules {
            ranks,
            rank_copies_per_deck: 52,
            min_bet: 5.0,
        };
        let mut counts = vec![7; 13];
        counts[0] = 16;
        let shoe = Shoe::from_counts(counts, 8, 7);

        let mut p = Participant::player(Arc::new(StrategyTable::basic(true)));
        p.set_bet_from_count(&shoe, &rules);
        assert!((p.bet() - 265.4).abs() < 1e-3);

        // a flat running count sits the seat out entirely
        let flat = Shoe::from_counts(vec![8; 13], 0, 7);
        p.set_bet_from_count(&flat, &rules);
        assert_eq!(p.bet(), 0.0);
    }
}
