// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Bet amounts.
use std::fmt;

use crate::money::Dollars;

/// A bet in coins, from one to [Bet::MAX_COINS] coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bet(u8);

impl Bet {
    /// The value of a coin.
    pub const COIN: Dollars = Dollars::new(5);

    /// The maximum number of coins for a bet.
    pub const MAX_COINS: u8 = 5;

    /// The smallest bet.
    pub const MIN: Bet = Bet(1);

    /// The largest bet.
    pub const MAX: Bet = Bet(Self::MAX_COINS);

    /// Creates a bet with the given coins, `None` if not in 1..=5.
    pub fn with_coins(coins: u8) -> Option<Bet> {
        (1..=Self::MAX_COINS).contains(&coins).then_some(Bet(coins))
    }

    /// Bets one more coin, after the maximum bet goes back to one coin.
    pub fn bet_one(&mut self) {
        self.0 = self.0 % Self::MAX_COINS + 1;
    }

    /// Bets the maximum coins.
    pub fn bet_max(&mut self) {
        self.0 = Self::MAX_COINS;
    }

    /// Checks if this is the maximum bet.
    pub fn is_max(&self) -> bool {
        self.0 == Self::MAX_COINS
    }

    /// The number of coins.
    pub fn coins(&self) -> u8 {
        self.0
    }

    /// The bet amount in dollars.
    pub fn amount(&self) -> Dollars {
        Self::COIN * self.0 as u32
    }
}

impl Default for Bet {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_cycle() {
        let mut bet = Bet::default();
        assert_eq!(bet.to_string(), "$5");

        let mut amounts = Vec::new();
        for _ in 0..5 {
            bet.bet_one();
            amounts.push(bet.to_string());
        }
        assert_eq!(amounts, ["$10", "$15", "$20", "$25", "$5"]);
    }

    #[test]
    fn bet_max() {
        let mut bet = Bet::default();
        assert!(!bet.is_max());

        bet.bet_max();
        assert!(bet.is_max());
        assert_eq!(bet.coins(), 5);
        assert_eq!(bet.amount(), Dollars::new(25));

        bet.bet_one();
        assert_eq!(bet, Bet::MIN);
    }

    #[test]
    fn bet_with_coins() {
        assert_eq!(Bet::with_coins(0), None);
        assert_eq!(Bet::with_coins(3).map(|b| b.amount()), Some(Dollars::new(15)));
        assert_eq!(Bet::with_coins(5), Some(Bet::MAX));
        assert_eq!(Bet::with_coins(6), None);
    }
}
