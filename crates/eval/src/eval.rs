// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five cards hand evaluator.
use std::{cmp::Ordering, fmt};

use jacks_cards::{Card, Rank};

/// The category of a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandRank {
    /// No pairs, straights, or flushes.
    HighCard = 0,
    /// Two cards with the same rank.
    OnePair,
    /// Two different pairs.
    TwoPair,
    /// Three cards with the same rank.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind with a pair.
    FullHouse,
    /// Four cards with the same rank.
    FourOfAKind,
    /// A straight with all cards of the same suit.
    StraightFlush,
}

impl HandRank {
    /// The number of hand ranks.
    pub const COUNT: usize = 9;

    fn from_bits(bits: u32) -> HandRank {
        match bits {
            0 => HandRank::HighCard,
            1 => HandRank::OnePair,
            2 => HandRank::TwoPair,
            3 => HandRank::ThreeOfAKind,
            4 => HandRank::Straight,
            5 => HandRank::Flush,
            6 => HandRank::FullHouse,
            7 => HandRank::FourOfAKind,
            8 => HandRank::StraightFlush,
            _ => unreachable!("Invalid hand rank {bits}"),
        }
    }

    /// The number of ranks needed to break ties for this category.
    fn kickers(&self) -> usize {
        match self {
            HandRank::HighCard | HandRank::Flush => 5,
            HandRank::OnePair => 4,
            HandRank::TwoPair | HandRank::ThreeOfAKind => 3,
            HandRank::FullHouse | HandRank::FourOfAKind => 2,
            HandRank::Straight | HandRank::StraightFlush => 1,
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{s}")
    }
}

/// The value of a five cards hand.
///
/// Values compare by category first and then by the ranks that break ties
/// within the category, with grouped cards before kickers. The value is
/// packed in a u32 as:
///
/// ```text
///   +--------+--------+--------+--------+
///   |xxxxxxxx|cccc1111|22223333|44445555|
///   +--------+--------+--------+--------+
///   c = hand rank
///   1..5 = tie break ranks, most significant first
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandValue(u32);

/// Rank mask of a wheel straight A-2-3-4-5.
const WHEEL: u16 = 0b1_0000_0000_1111;

impl HandValue {
    /// Evaluates a five cards hand.
    pub fn eval(cards: &[Card; 5]) -> HandValue {
        let mut counts = [0u8; 13];
        let mut mask = 0u16;
        let mut suits = 0xf;

        for card in cards {
            counts[card.rank_bits() as usize] += 1;
            mask |= card.rank_mask();
            suits &= card.suit_bits();
        }

        let is_flush = suits != 0;

        // Five distinct ranks, check for straights.
        if mask.count_ones() == 5 {
            let high = if mask >> mask.trailing_zeros() == 0b1_1111 {
                Some(15 - mask.leading_zeros() as u8)
            } else if mask == WHEEL {
                Some(Rank::Five as u8)
            } else {
                None
            };

            return match (high, is_flush) {
                (Some(high), true) => Self::pack(HandRank::StraightFlush, &[high]),
                (Some(high), false) => Self::pack(HandRank::Straight, &[high]),
                (None, true) => Self::pack(HandRank::Flush, &Self::descending(mask)),
                (None, false) => Self::pack(HandRank::HighCard, &Self::descending(mask)),
            };
        }

        // Group ranks by count then by rank, largest first.
        let mut groups = [(0u8, 0u8); 5];
        let mut len = 0;
        for (rank, count) in counts.iter().enumerate().rev().filter(|(_, c)| **c > 0) {
            groups[len] = (*count, rank as u8);
            len += 1;
        }
        groups[..len].sort_unstable_by(|a, b| b.cmp(a));

        let mut ranks = [0u8; 5];
        for (r, (_, rank)) in ranks.iter_mut().zip(&groups[..len]) {
            *r = *rank;
        }

        let rank = match (groups[0].0, groups[1].0) {
            (4, _) => HandRank::FourOfAKind,
            (3, 2) => HandRank::FullHouse,
            (3, _) => HandRank::ThreeOfAKind,
            (2, 2) => HandRank::TwoPair,
            _ => HandRank::OnePair,
        };

        Self::pack(rank, &ranks[..len])
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        HandRank::from_bits(self.0 >> 20)
    }

    /// The ranks that break ties within the category, most significant first.
    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        (0..self.rank().kickers())
            .map(move |i| Rank::from_bits(((self.0 >> (16 - 4 * i)) & 0xf) as u8))
    }

    /// The highest rank of the hand, for straights the top of the straight.
    pub fn high_rank(&self) -> Rank {
        Rank::from_bits(((self.0 >> 16) & 0xf) as u8)
    }

    /// The rank of the pair if this is a one pair hand.
    pub fn pair_rank(&self) -> Option<Rank> {
        (self.rank() == HandRank::OnePair).then(|| self.high_rank())
    }

    fn descending(mask: u16) -> [u8; 5] {
        let mut ranks = [0u8; 5];
        let bits = (0..13u8).rev().filter(|r| mask & (1 << r) != 0);
        for (r, bit) in ranks.iter_mut().zip(bits) {
            *r = bit;
        }
        ranks
    }

    fn pack(rank: HandRank, ranks: &[u8]) -> HandValue {
        let value = ranks
            .iter()
            .take(5)
            .enumerate()
            .fold((rank as u32) << 20, |acc, (i, r)| {
                acc | ((*r as u32) << (16 - 4 * i))
            });
        HandValue(value)
    }
}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())?;
        for (i, rank) in self.ranks().enumerate() {
            let sep = if i == 0 { " " } else { "," };
            write!(f, "{sep}{rank}")?;
        }
        Ok(())
    }
}
