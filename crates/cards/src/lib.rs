// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Jacks video poker cards types.
//!
//! Cards are created from a rank and a suit or parsed from their two
//! characters name:
//!
//! ```
//! # use jacks_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd: Card = "KD".parse().unwrap();
//! assert!(ah.rank() > kd.rank());
//! ```
//!
//! and a [Deck] type for shuffling, dealing, and enumerating the cards left in
//! the deck.
//!
//! For example to iterate through all the possible 2 cards draws after a
//! 5 cards hand has been dealt:
//!
//! ```
//! # use jacks_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! for _ in 0..5 {
//!     deck.deal();
//! }
//!
//! let mut counter = 0;
//! deck.for_each(2, |draw| {
//!     assert_eq!(draw.len(), 2);
//!     counter += 1;
//! });
//! assert_eq!(counter, 1_081);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, ParseCardError, Rank, Suit};
