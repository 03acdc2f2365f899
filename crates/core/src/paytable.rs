// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Jacks or Better pay tables.
use std::{fmt, str::FromStr};
use thiserror::Error;

use jacks_cards::{Card, Rank};
use jacks_eval::{HandRank, HandValue};

use crate::{bet::Bet, money::Dollars};

/// A paying hand, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PayHand {
    /// Ace high straight flush.
    RoyalFlush = 0,
    /// Straight flush.
    StraightFlush,
    /// Four of a kind.
    FourOfAKind,
    /// Full house.
    FullHouse,
    /// Flush.
    Flush,
    /// Straight.
    Straight,
    /// Three of a kind.
    ThreeOfAKind,
    /// Two pair.
    TwoPair,
    /// A pair of jacks, queens, kings, or aces.
    JacksOrBetter,
    /// Nothing.
    Zilch,
}

impl PayHand {
    /// The hands shown in the pay table, from best to worst.
    pub const HANDS: [PayHand; 9] = [
        PayHand::RoyalFlush,
        PayHand::StraightFlush,
        PayHand::FourOfAKind,
        PayHand::FullHouse,
        PayHand::Flush,
        PayHand::Straight,
        PayHand::ThreeOfAKind,
        PayHand::TwoPair,
        PayHand::JacksOrBetter,
    ];

    /// The number of pay hands including [PayHand::Zilch].
    pub const COUNT: usize = 10;

    /// Classifies a five cards hand.
    pub fn classify(cards: &[Card; 5]) -> PayHand {
        Self::from_value(HandValue::eval(cards))
    }

    /// Maps a hand value to a pay hand.
    pub fn from_value(value: HandValue) -> PayHand {
        match value.rank() {
            HandRank::StraightFlush if value.high_rank() == Rank::Ace => PayHand::RoyalFlush,
            HandRank::StraightFlush => PayHand::StraightFlush,
            HandRank::FourOfAKind => PayHand::FourOfAKind,
            HandRank::FullHouse => PayHand::FullHouse,
            HandRank::Flush => PayHand::Flush,
            HandRank::Straight => PayHand::Straight,
            HandRank::ThreeOfAKind => PayHand::ThreeOfAKind,
            HandRank::TwoPair => PayHand::TwoPair,
            HandRank::OnePair if value.high_rank() >= Rank::Jack => PayHand::JacksOrBetter,
            HandRank::OnePair | HandRank::HighCard => PayHand::Zilch,
        }
    }

    /// Gets a pay hand from its index, `None` if out of range.
    pub fn from_index(idx: usize) -> Option<PayHand> {
        Self::HANDS.get(idx).copied().or_else(|| {
            (idx == PayHand::Zilch as usize).then_some(PayHand::Zilch)
        })
    }

    /// The hand display name.
    pub fn label(&self) -> &'static str {
        match self {
            PayHand::RoyalFlush => "Royal Flush",
            PayHand::StraightFlush => "Straight Flush",
            PayHand::FourOfAKind => "Four of a Kind",
            PayHand::FullHouse => "Full House",
            PayHand::Flush => "Flush",
            PayHand::Straight => "Straight",
            PayHand::ThreeOfAKind => "Three of a Kind",
            PayHand::TwoPair => "Two Pair",
            PayHand::JacksOrBetter => "Jacks or Better",
            PayHand::Zilch => "Zilch",
        }
    }
}

impl fmt::Display for PayHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A row of the pay table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayRow {
    /// The paying hand.
    pub hand: PayHand,
    /// The coins paid for a bet of 1 to 5 coins.
    pub coins: [u32; Bet::MAX_COINS as usize],
}

/// Error returned when parsing an invalid pay table name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pay table {0:?}, expected full house/flush multipliers like 9/6")]
pub struct ParsePayTableError(String);

/// A pay table with per coin multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayTable {
    multipliers: [u32; PayHand::COUNT],
}

impl PayTable {
    /// The royal flush multiplier with a maximum bet.
    pub const ROYAL_MAX_BET: u32 = 16;

    /// Creates a Jacks or Better table with the given full house and flush
    /// multipliers, the full pay table is 9/6.
    pub const fn jacks_or_better(full_house: u32, flush: u32) -> Self {
        Self {
            multipliers: [250, 50, 25, full_house, flush, 4, 3, 2, 1, 0],
        }
    }

    /// The per coin multiplier for a hand.
    pub fn multiplier(&self, hand: PayHand) -> u32 {
        self.multipliers[hand as usize]
    }

    /// The coins paid for a hand, the stake included.
    pub fn payout(&self, hand: PayHand, bet: Bet) -> u32 {
        let multiplier = self.multiplier(hand);
        if hand == PayHand::RoyalFlush && bet.is_max() {
            multiplier * Self::ROYAL_MAX_BET
        } else {
            multiplier * bet.coins() as u32
        }
    }

    /// The dollars paid for a hand, the stake included.
    pub fn winnings(&self, hand: PayHand, bet: Bet) -> Dollars {
        Bet::COIN * self.payout(hand, bet)
    }

    /// The pay table rows for the paying hands, from best to worst.
    pub fn rows(&self) -> impl Iterator<Item = PayRow> + '_ {
        PayHand::HANDS.into_iter().map(|hand| {
            let mut coins = [0; Bet::MAX_COINS as usize];
            for (n, c) in (1..=Bet::MAX_COINS).zip(coins.iter_mut()) {
                let bet = Bet::with_coins(n).unwrap_or_default();
                *c = self.payout(hand, bet);
            }

            PayRow { hand, coins }
        })
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::jacks_or_better(9, 6)
    }
}

impl fmt::Display for PayTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.multiplier(PayHand::FullHouse),
            self.multiplier(PayHand::Flush)
        )
    }
}

impl FromStr for PayTable {
    type Err = ParsePayTableError;

    /// Parses a Jacks or Better table name like "9/6" or "8/5".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePayTableError(s.to_string());
        let (full_house, flush) = s.trim().split_once('/').ok_or_else(err)?;
        let full_house = full_house.parse::<u32>().map_err(|_| err())?;
        let flush = flush.parse::<u32>().map_err(|_| err())?;

        // Keep the hands order, a flush can't pay less than a straight.
        if !(4..=full_house).contains(&flush) || full_house > 25 {
            return Err(err());
        }

        Ok(Self::jacks_or_better(full_house, flush))
    }
}
