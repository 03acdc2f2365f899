// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Text reports for the pay table, players and simulations.
use ahash::AHashMap;
use std::fmt::Write;

use jacks_core::{Bet, PayHand, PayTable, db::Stats};

use crate::sim::SimReport;

/// Prints a pay table.
pub fn print_paytable(paytable: &PayTable) {
    print!("{}", paytable_text(paytable));
}

/// Prints a player statistics.
pub fn print_stats(player: &str, stats: &Stats) {
    println!("Player {player}");
    if stats.hands == 0 {
        println!("No hands played");
        return;
    }

    println!("Hands    {:>12}", stats.hands);
    println!("Wagered  {:>12}", stats.wagered.to_string());
    println!("Won      {:>12}", stats.won.to_string());
    println!("Return   {:>11.2}%", stats.return_rate() * 100.0);
    if let Some(best) = stats.best {
        println!("Best     {best:>12}");
    }
    println!();
    print!("{}", frequencies_text(stats.hands, &stats.counts));
}

/// Prints a simulation report.
pub fn print_sim(report: &SimReport, paytable: &PayTable) {
    println!("Jacks or Better {paytable}");
    println!("Hands    {:>12}", report.hands);
    println!("Wagered  {:>12}", report.wagered.to_string());
    println!("Won      {:>12}", report.won.to_string());
    println!("Return   {:>11.2}%", report.return_rate() * 100.0);
    println!("Elapsed  {:>11.1}s", report.elapsed.as_secs_f64());
    println!();
    print!("{}", frequencies_text(report.hands, &report.counts));
}

fn paytable_text(paytable: &PayTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Jacks or Better {paytable}");

    let _ = write!(out, "{:<16}", "");
    for coins in 1..=Bet::MAX_COINS {
        let _ = write!(out, "{:>7}", format!("{coins} coin"));
    }
    let _ = writeln!(out);

    for row in paytable.rows() {
        let _ = write!(out, "{:<16}", row.hand.label());
        for coins in row.coins {
            let _ = write!(out, "{coins:>7}");
        }
        let _ = writeln!(out);
    }

    out
}

fn frequencies_text(hands: u32, counts: &AHashMap<PayHand, u32>) -> String {
    let mut out = String::new();
    let all = PayHand::HANDS.into_iter().chain([PayHand::Zilch]);
    for hand in all {
        let count = counts.get(&hand).copied().unwrap_or_default();
        let freq = if hands == 0 {
            0.0
        } else {
            count as f64 / hands as f64 * 100.0
        };
        let _ = writeln!(out, "{:<16}{count:>10}{freq:>9.3}%", hand.label());
    }

    out
}
