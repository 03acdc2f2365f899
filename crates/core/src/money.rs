// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Money amounts.
use std::{fmt, ops};

/// A dollars amount.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dollars(u32);

impl Dollars {
    /// Zero dollars.
    pub const ZERO: Dollars = Dollars(0);

    /// Creates dollars with the given value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The integer amount.
    pub fn amount(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Dollars {
    fn from(val: u32) -> Self {
        Dollars(val)
    }
}

impl From<Dollars> for u32 {
    fn from(val: Dollars) -> Self {
        val.0
    }
}

impl ops::Add for Dollars {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Dollars(self.0.saturating_add(rhs.0))
    }
}

impl ops::AddAssign for Dollars {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl ops::Sub for Dollars {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl ops::SubAssign for Dollars {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl ops::Mul<u32> for Dollars {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(rhs))
    }
}

impl std::iter::Sum for Dollars {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Dollars::ZERO, |acc, d| acc + d)
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        for (idx, c) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }

        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_formatting() {
        assert_eq!(Dollars(0).to_string(), "$0");
        assert_eq!(Dollars(25).to_string(), "$25");
        assert_eq!(Dollars(1_000).to_string(), "$1,000");
        assert_eq!(Dollars(12_345).to_string(), "$12,345");
        assert_eq!(Dollars(1_000_000).to_string(), "$1,000,000");
        assert_eq!(Dollars(1_234_567).to_string(), "$1,234,567");
        assert_eq!(Dollars(2_000_000_000).to_string(), "$2,000,000,000");
        assert_eq!(Dollars(u32::MAX).to_string(), "$4,294,967,295");
    }

    #[test]
    fn dollars_arithmetic() {
        let mut bank = Dollars::new(10);
        bank -= Dollars::new(25);
        assert_eq!(bank, Dollars::ZERO);

        bank += Dollars::new(5) * 3;
        assert_eq!(bank, Dollars::new(15));
        assert_eq!(Dollars::new(u32::MAX) + Dollars::new(1), Dollars::new(u32::MAX));

        let total: Dollars = [5, 10, 15].into_iter().map(Dollars::new).sum();
        assert_eq!(total.amount(), 30);
    }
}
