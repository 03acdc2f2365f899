// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Database types for persisting players banks and hands.
use ahash::AHashMap;
use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::{path::Path, sync::Arc};

use crate::{
    machine::Outcome,
    money::Dollars,
    paytable::PayHand,
};

/// A database player row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// The player name.
    pub name: String,
    /// The player bank.
    pub bank: Dollars,
}

/// A player statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// The number of hands played.
    pub hands: u32,
    /// The total amount bet.
    pub wagered: Dollars,
    /// The total amount paid.
    pub won: Dollars,
    /// The best paying hand.
    pub best: Option<PayHand>,
    /// The number of hands for each pay hand.
    pub counts: AHashMap<PayHand, u32>,
}

impl Stats {
    /// The payout as a fraction of the amount bet.
    pub fn return_rate(&self) -> f64 {
        if self.wagered == Dollars::ZERO {
            0.0
        } else {
            self.won.amount() as f64 / self.wagered.amount() as f64
        }
    }
}

/// Database for persisting players state.
#[derive(Debug, Clone)]
pub struct Db {
    db: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open an in memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Create tables
        conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
               name TEXT PRIMARY KEY,
               bank INTEGER NOT NULL,
               created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
               last_update DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS hands (
               id INTEGER PRIMARY KEY AUTOINCREMENT,
               player TEXT NOT NULL REFERENCES players(name),
               cards TEXT NOT NULL,
               hand INTEGER NOT NULL,
               bet INTEGER NOT NULL,
               winnings INTEGER NOT NULL,
               played_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )?;

        Ok(Db {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get a player or insert one with the given bank.
    pub async fn get_or_insert_player(&self, name: &str, bank: Dollars) -> Result<Player> {
        let db = self.db.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();

            let mut stmt = db.prepare(
                "SELECT name, bank
                 FROM players
                 WHERE name = ?1",
            )?;

            let res = stmt.query_row(params![name], |row| {
                Ok(Player {
                    name: row.get(0)?,
                    bank: Dollars::new(row.get::<usize, u32>(1)?),
                })
            });

            match res {
                Ok(player) => Ok(player),
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    let player = Player { name, bank };

                    db.execute(
                        "INSERT INTO players (name, bank, last_update)
                         VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                        params![player.name, player.bank.amount()],
                    )?;

                    Ok(player)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }

    /// Updates a player bank.
    pub async fn update_bank(&self, name: &str, bank: Dollars) -> Result<()> {
        let db = self.db.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();

            let updated = db.execute(
                "UPDATE players SET
                   bank = ?1,
                   last_update = CURRENT_TIMESTAMP
                 WHERE name = ?2",
                params![bank.amount(), name],
            )?;

            if updated == 0 {
                return Err(anyhow!("Player {name} not found"));
            }

            Ok(())
        })
        .await?
    }

    /// Records a finished hand and the player bank after the payout.
    pub async fn record_hand(&self, name: &str, outcome: Outcome, bank: Dollars) -> Result<()> {
        let db = self.db.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let mut db = db.lock();

            let tx = db.transaction()?;

            let cards = outcome.cards.map(|c| c.to_string()).join(" ");
            tx.execute(
                "INSERT INTO hands (player, cards, hand, bet, winnings)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    name,
                    cards,
                    outcome.hand as u32,
                    outcome.bet.amount().amount(),
                    outcome.winnings.amount()
                ],
            )?;

            let updated = tx.execute(
                "UPDATE players SET
                   bank = ?1,
                   last_update = CURRENT_TIMESTAMP
                 WHERE name = ?2",
                params![bank.amount(), name],
            )?;

            // Dropping the transaction rolls back the hand insert.
            if updated == 0 {
                return Err(anyhow!("Player {name} not found"));
            }

            tx.commit()?;

            Ok(())
        })
        .await?
    }

    /// Gets a player statistics.
    pub async fn stats(&self, name: &str) -> Result<Stats> {
        let db = self.db.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();

            let mut stmt = db.prepare(
                "SELECT hand, COUNT(*), SUM(bet), SUM(winnings)
                 FROM hands
                 WHERE player = ?1
                 GROUP BY hand",
            )?;

            let rows = stmt.query_map(params![name], |row| {
                Ok((
                    row.get::<usize, u32>(0)?,
                    row.get::<usize, u32>(1)?,
                    row.get::<usize, i64>(2)?,
                    row.get::<usize, i64>(3)?,
                ))
            })?;

            let mut stats = Stats::default();
            for row in rows {
                let (hand, count, bet, winnings) = row?;
                let hand = PayHand::from_index(hand as usize)
                    .ok_or_else(|| anyhow!("Invalid hand {hand}"))?;

                stats.hands += count;
                stats.wagered += Dollars::new(u32::try_from(bet)?);
                stats.won += Dollars::new(u32::try_from(winnings)?);
                stats.counts.insert(hand, count);

                if hand != PayHand::Zilch {
                    stats.best = Some(stats.best.map_or(hand, |best| best.min(hand)));
                }
            }

            Ok(stats)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::Bet;
    use jacks_cards::Card;

    fn outcome(cards: &str, hand: PayHand, bet: Bet, winnings: u32) -> Outcome {
        let cards = cards
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect::<Vec<Card>>();

        Outcome {
            cards: cards.try_into().unwrap(),
            hand,
            bet,
            winnings: Dollars::new(winnings),
        }
    }

    #[tokio::test]
    async fn get_or_insert_player() {
        let db = Db::open_in_memory().unwrap();

        let player = db.get_or_insert_player("alice", Dollars::new(1_000)).await.unwrap();
        assert_eq!(player.name, "alice");
        assert_eq!(player.bank, Dollars::new(1_000));

        db.update_bank("alice", Dollars::new(995)).await.unwrap();

        // The stored bank is returned for an existing player.
        let player = db.get_or_insert_player("alice", Dollars::new(1_000)).await.unwrap();
        assert_eq!(player.bank, Dollars::new(995));

        assert!(db.update_bank("bob", Dollars::new(10)).await.is_err());
    }

    #[tokio::test]
    async fn record_hands_stats() {
        let db = Db::open_in_memory().unwrap();
        db.get_or_insert_player("alice", Dollars::new(1_000)).await.unwrap();

        let stats = db.stats("alice").await.unwrap();
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.return_rate(), 0.0);

        let hands = [
            outcome("JS JH 3D 7C 9S", PayHand::JacksOrBetter, Bet::MIN, 5),
            outcome("2S 5H 8D TC KS", PayHand::Zilch, Bet::MAX, 0),
            outcome("QS QH QD 4C 9S", PayHand::ThreeOfAKind, Bet::MAX, 75),
            outcome("3S 5H 8D TC KS", PayHand::Zilch, Bet::MIN, 0),
        ];

        for hand in hands {
            db.record_hand("alice", hand, Dollars::new(1_000)).await.unwrap();
        }

        let stats = db.stats("alice").await.unwrap();
        assert_eq!(stats.hands, 4);
        assert_eq!(stats.wagered, Dollars::new(60));
        assert_eq!(stats.won, Dollars::new(80));
        assert_eq!(stats.best, Some(PayHand::ThreeOfAKind));
        assert_eq!(stats.counts.get(&PayHand::Zilch), Some(&2));
        assert_eq!(stats.counts.get(&PayHand::JacksOrBetter), Some(&1));

        // Hands for unknown players are not stored.
        let hand = outcome("JS JH 3D 7C 9S", PayHand::JacksOrBetter, Bet::MIN, 5);
        assert!(db.record_hand("carol", hand, Dollars::new(5)).await.is_err());
        assert_eq!(db.stats("carol").await.unwrap().hands, 0);

        // Other players don't see these hands.
        db.get_or_insert_player("bob", Dollars::new(1_000)).await.unwrap();
        assert_eq!(db.stats("bob").await.unwrap().hands, 0);
    }
}
