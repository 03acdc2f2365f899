// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Jacks video poker game rules.
//!
//! A [Machine] deals five cards, the player holds some of them and draws
//! replacements, the final hand is paid using a [PayTable]:
//!
//! ```
//! # use jacks_core::*;
//! let mut machine = Machine::new(Config::default());
//! machine.bet_max().unwrap();
//! machine.deal().unwrap();
//! machine.settle();
//!
//! let advice = machine.advise().unwrap();
//! machine.set_holds(advice.holds).unwrap();
//! machine.draw().unwrap();
//! machine.settle();
//!
//! let outcome = machine.outcome().unwrap();
//! assert_eq!(machine.bank(), Dollars::new(975) + outcome.winnings);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod advisor;
pub mod bet;
pub mod db;
pub mod machine;
pub mod money;
pub mod paytable;

pub use advisor::Advice;
pub use bet::Bet;
pub use machine::{Config, Controls, GameError, GameEvent, Machine, Outcome, Phase, Slot};
pub use money::Dollars;
pub use paytable::{PayHand, PayRow, PayTable};

// Reexport cards types.
pub use jacks_cards::{Card, Deck, Rank, Suit};
