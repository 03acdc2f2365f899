// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Jacks video poker hand evaluator.
//!
//! Evaluates five cards poker hands using the bit fields of the
//! [Cactus Kev's][kevlink] card encoding: flushes are detected by and-ing the
//! suit bits, straights by or-ing the rank bits, and pairs by counting ranks.
//!
//! To use the evaluator create a hand and use [HandValue] to evaluate the hand
//! and get its rank:
//!
//! ```
//! # use jacks_eval::*;
//! // 2C, 3C, .., JC
//! let cards = Deck::default().into_iter().take(10).collect::<Vec<_>>();
//! let v1 = HandValue::eval(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
//! let v2 = HandValue::eval(&[cards[5], cards[6], cards[7], cards[8], cards[9]]);
//! assert_eq!(v2.rank(), HandRank::StraightFlush);
//! assert!(v2 > v1);
//! ```
//!
//! [kevlink]: http://suffe.cool/poker/evaluator.html
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue};

// Reexport cards types.
pub use jacks_cards::{Card, Deck, Rank, Suit};
