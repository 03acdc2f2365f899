// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hold strategy advisor.
//!
//! For each of the 32 ways to hold a five cards hand the advisor enumerates all
//! the draws from the 47 cards left in the deck, 2,598,960 hands in total, and
//! picks the holds with the highest expected payout for the given pay table.
use std::{panic, thread};

use jacks_cards::{Card, Deck};

use crate::{
    bet::Bet,
    machine::HAND_SIZE,
    paytable::{PayHand, PayTable},
};

/// The number of ways to hold a hand.
const HOLD_PATTERNS: usize = 1 << HAND_SIZE;

/// The best holds for a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advice {
    /// The cards to hold.
    pub holds: [bool; HAND_SIZE],
    /// The expected payout in coins, the stake included.
    pub expected_coins: f64,
    /// The bet used to compute the payout.
    pub bet: Bet,
}

impl Advice {
    /// The expected payout as a fraction of the bet.
    pub fn return_rate(&self) -> f64 {
        self.expected_coins / self.bet.coins() as f64
    }

    /// The expected payout in dollars.
    pub fn expected_dollars(&self) -> f64 {
        self.expected_coins * Bet::COIN.amount() as f64
    }
}

/// Computes the best holds for a hand.
pub fn advise(cards: &[Card; HAND_SIZE], paytable: &PayTable, bet: Bet) -> Advice {
    let mut deck = Deck::default();
    for card in cards {
        deck.remove(*card);
    }

    let num_tasks = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(HOLD_PATTERNS);

    let mut advices = thread::scope(|s| {
        let handles = (0..num_tasks)
            .map(|task_id| {
                let deck = &deck;
                s.spawn(move || {
                    (task_id..HOLD_PATTERNS)
                        .step_by(num_tasks)
                        .map(|mask| expected_payout(cards, mask, deck, paytable, bet))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });

    // Prefer the holds that keep more cards when payouts are equal.
    advices.sort_by(|a, b| {
        let held = |a: &Advice| a.holds.iter().filter(|h| **h).count();
        a.expected_coins
            .total_cmp(&b.expected_coins)
            .then_with(|| held(a).cmp(&held(b)))
    });

    advices.pop().unwrap_or(Advice {
        holds: [true; HAND_SIZE],
        expected_coins: paytable.payout(PayHand::classify(cards), bet) as f64,
        bet,
    })
}

/// Computes the expected payout for the cards in the mask bits.
fn expected_payout(
    cards: &[Card; HAND_SIZE],
    mask: usize,
    deck: &Deck,
    paytable: &PayTable,
    bet: Bet,
) -> Advice {
    let mut holds = [false; HAND_SIZE];
    let mut hand = *cards;
    let mut held = 0;

    // Held cards go first, the draw fills the rest of the hand.
    for (idx, card) in cards.iter().enumerate() {
        if mask & (1 << idx) != 0 {
            holds[idx] = true;
            hand[held] = *card;
            held += 1;
        }
    }

    let mut total = 0u64;
    let mut count = 0u64;
    deck.for_each(HAND_SIZE - held, |draw| {
        hand[held..].copy_from_slice(draw);
        total += paytable.payout(PayHand::classify(&hand), bet) as u64;
        count += 1;
    });

    Advice {
        holds,
        expected_coins: total as f64 / count.max(1) as f64,
        bet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> [Card; HAND_SIZE] {
        let cards = s
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect::<Vec<Card>>();
        cards.try_into().unwrap()
    }

    fn holds(s: &str) -> [bool; HAND_SIZE] {
        let mut holds = [false; HAND_SIZE];
        for (h, c) in holds.iter_mut().zip(s.chars()) {
            *h = c == 'x';
        }
        holds
    }

    #[test]
    fn hold_pat_hands() {
        let table = PayTable::default();

        let advice = advise(&hand("AH KH QH JH TH"), &table, Bet::MAX);
        assert_eq!(advice.holds, [true; HAND_SIZE]);
        assert_eq!(advice.expected_coins, 4000.0);
        assert_eq!(advice.return_rate(), 800.0);

        let advice = advise(&hand("KS KH KD 4C 4S"), &table, Bet::MIN);
        assert_eq!(advice.holds, [true; HAND_SIZE]);
        assert_eq!(advice.expected_dollars(), 45.0);
    }

    #[test]
    fn hold_all_cards_on_ties() {
        let table = PayTable::default();

        let advice = advise(&hand("7S 7H 7D 7C 2S"), &table, Bet::MIN);
        assert_eq!(advice.holds, [true; HAND_SIZE]);
        assert_eq!(advice.expected_coins, 25.0);

        // Drawing to the four sevens pays the same.
        let cards = hand("7S 7H 7D 7C 2S");
        let deck = Deck::default()
            .into_iter()
            .filter(|c| !cards.contains(c))
            .collect::<Deck>();
        let quads = expected_payout(&cards, 0b01111, &deck, &table, Bet::MIN);
        assert_eq!(quads.holds, [true, true, true, true, false]);
        assert_eq!(quads.expected_coins, advice.expected_coins);
    }

    #[test]
    fn hold_four_to_a_royal() {
        let table = PayTable::default();

        // Break a flush for a royal draw.
        let advice = advise(&hand("AH KH QH JH 2H"), &table, Bet::MAX);
        assert_eq!(advice.holds, holds("xxxx-"));
        assert!(advice.expected_coins > 90.0);
    }

    #[test]
    fn hold_high_pair() {
        let table = PayTable::default();

        let advice = advise(&hand("JS 3D JH 7C 9S"), &table, Bet::MIN);
        assert_eq!(advice.holds, holds("x-x--"));

        // A pair of jacks returns about 1.54 coins per coin.
        let rate = advice.return_rate();
        assert!(rate > 1.5 && rate < 1.6, "{rate}");
    }

    #[test]
    fn hold_low_pair_over_high_card() {
        let table = PayTable::default();

        let advice = advise(&hand("4S 4H 9D 2C KS"), &table, Bet::MIN);
        assert_eq!(advice.holds, holds("xx---"));
    }
}
