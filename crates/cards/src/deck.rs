// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Playing cards and the deck the machine deals from.
use rand::prelude::*;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The prime for each rank, deuce to ace.
const RANK_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// A playing card.
///
/// Cards are packed in a `u32` the way [Cactus Kev's evaluator][kev] does,
/// from the low bits up:
///
/// ```text
///   bits  0..8   rank prime, deuce 2 to ace 41
///   bits  8..12  rank index, deuce 0 to ace 12
///   bits 12..16  suit flag, spades 1 hearts 2 diamonds 4 clubs 8
///   bits 16..29  rank flag, one bit at the rank index
/// ```
///
/// The suit flags of five cards AND to non zero for a flush and the rank
/// flags OR to a mask with five bits for five distinct ranks.
///
/// [kev]: http://suffe.cool/poker/evaluator.html
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Card(u32);

impl Card {
    /// Creates a card.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        let idx = rank as u32;
        let prime = RANK_PRIMES[rank as usize];
        Self(prime | idx << 8 | (suit as u32) << 12 | 1 << (16 + idx))
    }

    /// The packed card value, unique for each card.
    pub fn id(&self) -> u32 {
        self.0
    }

    /// The card suit.
    pub fn suit(&self) -> Suit {
        match self.suit_bits() {
            1 => Suit::Spades,
            2 => Suit::Hearts,
            4 => Suit::Diamonds,
            8 => Suit::Clubs,
            bits => unreachable!("Card {:#x} has suit bits {bits:#x}", self.0),
        }
    }

    /// The card rank.
    pub fn rank(&self) -> Rank {
        Rank::from_bits(self.rank_bits())
    }

    /// The rank index, 0 for a deuce to 12 for an ace.
    #[inline]
    pub fn rank_bits(&self) -> u8 {
        (self.0 >> 8 & 0xf) as u8
    }

    /// The suit flag.
    #[inline]
    pub fn suit_bits(&self) -> u8 {
        (self.0 >> 12 & 0xf) as u8
    }

    /// The rank flag, one bit set at the rank index.
    #[inline]
    pub fn rank_mask(&self) -> u16 {
        (self.0 >> 16) as u16
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Card").field(&format_args!("{self}")).finish()
    }
}

/// Error returned when parsing an invalid card string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    /// The string doesn't have a rank and a suit.
    #[error("invalid card length: {0:?}")]
    Length(String),
    /// The rank character is unknown.
    #[error("invalid rank in card {0:?}")]
    Rank(String),
    /// The suit character is unknown.
    #[error("invalid suit in card {0:?}")]
    Suit(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses cards like "AH", "td", or "10s".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .filter(|&idx| idx > 0)
            .ok_or_else(|| ParseCardError::Length(s.to_string()))?;

        let (rank, suit) = s.split_at(split);
        let rank = match rank.to_ascii_uppercase().as_str() {
            "2" => Rank::Deuce,
            "3" => Rank::Trey,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(ParseCardError::Rank(s.to_string())),
        };

        let suit = match suit.to_ascii_uppercase().as_str() {
            "C" => Suit::Clubs,
            "D" => Suit::Diamonds,
            "H" => Suit::Hearts,
            "S" => Suit::Spades,
            _ => return Err(ParseCardError::Suit(s.to_string())),
        };

        Ok(Card::new(rank, suit))
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// Creates a rank from its 0..=12 position.
    ///
    /// Panics if bits is greater than 12.
    pub fn from_bits(bits: u8) -> Rank {
        match bits {
            0 => Rank::Deuce,
            1 => Rank::Trey,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            12 => Rank::Ace,
            _ => panic!("Invalid rank bits {bits}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 8,
    /// Diamonds suit.
    Diamonds = 4,
    /// Hearts suit.
    Hearts = 2,
    /// Spades suit.
    Spades = 1,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }

    /// The suit symbol used by the terminal.
    pub fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    /// Checks if this is a red suit.
    pub fn is_red(&self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }
}

/// A cards Deck
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// The largest draw [Deck::for_each] can enumerate.
    pub const MAX_DRAW: usize = 5;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Deals a card from the deck, returns `None` if the deck is empty.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }

    /// Checks if the deck contains a card.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Calls the `f` closure for each k-cards draw from the cards left in the deck.
    ///
    /// A draw of 0 cards calls `f` once with an empty slice.
    ///
    /// Panics if k is greater than [Deck::MAX_DRAW].
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!(k <= Self::MAX_DRAW, "k <= {}", Self::MAX_DRAW);

        let n = self.cards.len();
        if k > n {
            return;
        }

        if k == 0 {
            f(&[]);
            return;
        }

        // Walk the k-subsets in lexicographic order, idx[i] < idx[i + 1].
        let mut idx = [0usize; Self::MAX_DRAW];
        let mut hand = [self.cards[0]; Self::MAX_DRAW];
        for i in 0..k {
            idx[i] = i;
            hand[i] = self.cards[i];
        }

        loop {
            f(&hand[0..k]);

            // Find the rightmost index that can still move right.
            let mut i = k;
            while i > 0 && idx[i - 1] == n - k + i - 1 {
                i -= 1;
            }

            if i == 0 {
                break;
            }

            idx[i - 1] += 1;
            hand[i - 1] = self.cards[idx[i - 1]];
            for j in i..k {
                idx[j] = idx[j - 1] + 1;
                hand[j] = self.cards[idx[j]];
            }
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

/// Builds a deck from cards, the last card is the first to be dealt.
impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
