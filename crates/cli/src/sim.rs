// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Simulation of hands played with the advisor holds.
use ahash::AHashMap;
use anyhow::{Result, anyhow};
use log::info;
use std::time::{Duration, Instant};

use jacks_core::{Bet, Config, Dollars, Machine, PayHand, PayTable};

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// The number of hands to play.
    pub hands: u32,
    /// The bet for each hand.
    pub bet: Bet,
    /// The pay table.
    pub paytable: PayTable,
    /// Seed for reproducible decks.
    pub seed: Option<u64>,
}

/// Simulation results.
#[derive(Debug, Clone, Default)]
pub struct SimReport {
    /// The number of hands played.
    pub hands: u32,
    /// The total amount bet.
    pub wagered: Dollars,
    /// The total amount paid.
    pub won: Dollars,
    /// The number of hands for each pay hand.
    pub counts: AHashMap<PayHand, u32>,
    /// The simulation time.
    pub elapsed: Duration,
}

impl SimReport {
    /// The payout as a fraction of the amount bet.
    pub fn return_rate(&self) -> f64 {
        if self.wagered == Dollars::ZERO {
            0.0
        } else {
            self.won.amount() as f64 / self.wagered.amount() as f64
        }
    }
}

/// Plays the configured hands holding the cards suggested by the advisor.
pub fn run(config: SimConfig) -> Result<SimReport> {
    let mut machine = Machine::new(Config {
        bank: config.bet.amount() * config.hands,
        paytable: config.paytable,
        seed: config.seed,
    });

    while machine.bet() != config.bet {
        machine.bet_one()?;
    }

    let start = Instant::now();
    let mut report = SimReport::default();

    for n in 1..=config.hands {
        machine.deal()?;
        machine.settle();

        let advice = machine
            .advise()
            .ok_or_else(|| anyhow!("No advice for hand {n}"))?;
        machine.set_holds(advice.holds)?;
        machine.draw()?;
        machine.settle();

        let outcome = machine
            .outcome()
            .ok_or_else(|| anyhow!("Hand {n} not finished"))?;

        report.hands += 1;
        report.wagered += outcome.bet.amount();
        report.won += outcome.winnings;
        *report.counts.entry(outcome.hand).or_default() += 1;

        if n % 100 == 0 {
            info!(
                "Played {n} hands return {:.2}% elapsed {:.1}s",
                report.return_rate() * 100.0,
                start.elapsed().as_secs_f64()
            );
        }
    }

    report.elapsed = start.elapsed();
    Ok(report)
}
