// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Counts the categories of every five cards hand.
//!
//! ```bash
//! $ cargo r --release --example eval_all5
//! Straight Flush          40   0.0015%
//! Four of a Kind         624   0.0240%
//! Full House           3,744   0.1441%
//! ...
//! High Card        1,302,540  50.1177%
//! ```
use std::time::Instant;

use jacks_eval::*;

const RANKS: [HandRank; HandRank::COUNT] = [
    HandRank::StraightFlush,
    HandRank::FourOfAKind,
    HandRank::FullHouse,
    HandRank::Flush,
    HandRank::Straight,
    HandRank::ThreeOfAKind,
    HandRank::TwoPair,
    HandRank::OnePair,
    HandRank::HighCard,
];

fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn main() {
    let start = Instant::now();
    let mut counts = [0u64; HandRank::COUNT];

    Deck::default().for_each(5, |cards| {
        if let Ok(cards) = <&[Card; 5]>::try_from(cards) {
            counts[HandValue::eval(cards).rank() as usize] += 1;
        }
    });

    let secs = start.elapsed().as_secs_f64();
    let hands = counts.iter().sum::<u64>();

    for rank in RANKS {
        let count = counts[rank as usize];
        let pct = count as f64 * 100.0 / hands as f64;
        println!("{:<16}{:>10}{pct:>10.4}%", rank.to_string(), with_commas(count));
    }

    println!();
    println!(
        "{} hands in {secs:.3}s, {:.1}M hands/s",
        with_commas(hands),
        hands as f64 / secs / 1e6
    );
}
