//! Blackjack strategy trials: simulate repeated rounds of blackjack to
//! evaluate strategy tables and card-counting bet sizing. The `game` module
//! holds the table mechanics; this root drives whole simulations and compares
//! strategy profiles against each other.

pub mod game;

pub use game::prelude::*;

use std::fmt::Display;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use thiserror::Error;

pub mod prelude {
    pub use crate::game::prelude::*;
    pub use crate::{
        MultiProfileSimulator, MultiProfileSimulatorBuilder, SimulationError, SimulationSummary,
        Simulator, SimulatorConfig, SimulatorConfigBuilder,
    };
}

/// Errors from running whole simulations on top of the game layer.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("simulation worker failed: {0}")]
    Worker(String),
}

/// The interesting data points accumulated over one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub label: String,
    pub rounds: u32,
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub blackjacks: u32,
    pub winnings: f32,
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 60;
        const TEXT_WIDTH: usize = "number of player blackjacks".len() + 10;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        writeln!(f, "{:-^WIDTH$}", format!(" {} ", self.label))?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "rounds played", self.rounds)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "rounds won", self.wins)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "rounds pushed", self.pushes)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "rounds lost", self.losses)?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
            "number of player blackjacks", self.blackjacks
        )?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "winnings", self.winnings)?;
        if self.rounds > 0 {
            writeln!(
                f,
                "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
                "average winnings per round",
                self.winnings / (self.rounds as f32)
            )?;
        }
        Ok(())
    }
}

/// Knobs for a simulation run: table rules, shoe size, number of rounds,
/// when to reshuffle and an optional RNG seed for reproducibility.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub rules: Rules,
    pub num_decks: u32,
    pub rounds: u32,
    pub reshuffle_threshold: u32,
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    pub fn new() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder {
            rules: None,
            num_decks: None,
            rounds: None,
            reshuffle_threshold: None,
            seed: None,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig::new().build()
    }
}

/// Builder for `SimulatorConfig`.
#[derive(Debug, Clone)]
pub struct SimulatorConfigBuilder {
    rules: Option<Rules>,
    num_decks: Option<u32>,
    rounds: Option<u32>,
    reshuffle_threshold: Option<u32>,
    seed: Option<u64>,
}

impl SimulatorConfigBuilder {
    /// Overrides the standard table rules.
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Number of physical decks in the shoe.
    pub fn num_decks(mut self, decks: u32) -> Self {
        self.num_decks = Some(decks);
        self
    }

    /// Number of rounds per simulation run.
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Reshuffle once fewer than this many cards remain.
    pub fn reshuffle_threshold(mut self, cards: u32) -> Self {
        self.reshuffle_threshold = Some(cards);
        self
    }

    /// Fixes the RNG seed so the run is reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SimulatorConfig {
        SimulatorConfig {
            rules: self.rules.unwrap_or_else(Rules::standard),
            num_decks: self.num_decks.unwrap_or(6),
            rounds: self.rounds.unwrap_or(500),
            reshuffle_threshold: self.reshuffle_threshold.unwrap_or(52),
            seed: self.seed,
        }
    }
}

/// Drives one strategy profile through repeated rounds at its own table,
/// reshuffling the shoe before it runs dry and tallying outcomes.
pub struct Simulator {
    table: Table,
    config: SimulatorConfig,
    label: String,
    rounds_played: u32,
    wins: u32,
    pushes: u32,
    losses: u32,
    blackjacks: u32,
}

impl Simulator {
    pub fn new(label: &str, strategy: Arc<StrategyTable>, config: SimulatorConfig) -> Simulator {
        let mut table = match config.seed {
            Some(seed) => Table::with_seed(config.rules.clone(), config.num_decks, seed),
            None => Table::new(config.rules.clone(), config.num_decks),
        };
        table.add_player(strategy);
        Simulator {
            table,
            config,
            label: label.to_string(),
            rounds_played: 0,
            wins: 0,
            pushes: 0,
            losses: 0,
            blackjacks: 0,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Plays a single round, reshuffling first if the shoe is close to empty.
    pub fn run_round(&mut self) -> Result<(), SimulationError> {
        if self.table.shoe().total_remaining() < self.config.reshuffle_threshold {
            self.table.reshuffle(self.config.num_decks);
        }
        self.table.place_bets();
        for outcome in self.table.play_round()? {
            match outcome {
                Outcome::Win => self.wins += 1,
                Outcome::Push => self.pushes += 1,
                Outcome::Loss => self.losses += 1,
                Outcome::Blackjack => {
                    self.wins += 1;
                    self.blackjacks += 1;
                }
            }
        }
        self.rounds_played += 1;
        Ok(())
    }

    /// Runs the configured number of rounds.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        for _ in 0..self.config.rounds {
            self.run_round()?;
        }
        Ok(())
    }

    pub fn summary(&self) -> SimulationSummary {
        let winnings: f32 = self
            .table
            .players()
            .iter()
            .flat_map(|p| p.winnings_log.iter())
            .sum();
        SimulationSummary {
            label: self.label.clone(),
            rounds: self.rounds_played,
            wins: self.wins,
            pushes: self.pushes,
            losses: self.losses,
            blackjacks: self.blackjacks,
            winnings,
        }
    }

    /// Clears tallies, histories and the shoe so the simulator can run again.
    pub fn reset(&mut self) {
        for player in self.table.players_mut() {
            player.reset(true);
        }
        self.table.reshuffle(self.config.num_decks);
        self.rounds_played = 0;
        self.wins = 0;
        self.pushes = 0;
        self.losses = 0;
        self.blackjacks = 0;
    }
}

/// Compares several strategy profiles by running each in its own thread with
/// its own table and shoe; nothing is shared between runs. Summaries come
/// back over a channel once every profile finishes.
pub struct MultiProfileSimulator {
    simulators: Vec<Simulator>,
}

impl MultiProfileSimulator {
    pub fn new(config: SimulatorConfig) -> MultiProfileSimulatorBuilder {
        MultiProfileSimulatorBuilder {
            simulators: Vec::new(),
            config,
        }
    }

    pub fn run(&mut self) -> Result<Vec<SimulationSummary>, SimulationError> {
        let (sender, receiver) = mpsc::channel::<SimulationSummary>();
        let mut handles = Vec::new();

        while let Some(mut simulator) = self.simulators.pop() {
            let sender = sender.clone();
            let handle = thread::spawn(move || -> Result<(), SimulationError> {
                simulator.run()?;
                sender
                    .send(simulator.summary())
                    .map_err(|e| SimulationError::Worker(e.to_string()))?;
                Ok(())
            });
            handles.push(handle);
        }
        drop(sender);

        for handle in handles {
            handle
                .join()
                .map_err(|_| SimulationError::Worker("simulation thread panicked".to_string()))??;
        }

        let mut summaries: Vec<SimulationSummary> = receiver.iter().collect();
        summaries.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(summaries)
    }
}

/// Builder that seats one simulator per strategy profile, all sharing the
/// same configuration.
pub struct MultiProfileSimulatorBuilder {
    simulators: Vec<Simulator>,
    config: SimulatorConfig,
}

impl MultiProfileSimulatorBuilder {
    pub fn profile(mut self, label: &str, strategy: Arc<StrategyTable>) -> Self {
        self.simulators
            .push(Simulator::new(label, strategy, self.config.clone()));
        self
    }

    pub fn build(self) -> MultiProfileSimulator {
        MultiProfileSimulator {
            simulators: self.simulators,
        }
    }
}
