// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Jacks video poker terminal game.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use log::{info, warn};
use std::{fs, path::PathBuf, time::Duration};

use jacks_core::{Bet, Config, Dollars, Machine, PayTable, db::Db};

pub mod report;
pub mod sim;
pub mod terminal;

#[derive(Debug, Parser)]
#[clap(version, about = "Jacks or Better video poker", args_conflicts_with_subcommands = true)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
    #[clap(flatten)]
    play: PlayArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play in the terminal (default).
    Play(PlayArgs),
    /// Print the pay table.
    Payouts {
        /// The pay table full house/flush multipliers.
        #[clap(long, default_value = "9/6")]
        paytable: PayTable,
    },
    /// Simulate hands played with the advisor holds.
    Sim(SimArgs),
    /// Print a player statistics.
    Stats(StoreArgs),
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// The player name.
    #[clap(long, default_value = "player")]
    player: String,
    /// The database path, defaults to the user data directory.
    #[clap(long)]
    db: Option<PathBuf>,
}

impl StoreArgs {
    fn open(&self) -> Result<Db> {
        let path = match &self.db {
            Some(path) => path.clone(),
            None => {
                let dirs = ProjectDirs::from("", "", "jacks")
                    .ok_or_else(|| anyhow!("Cannot find the user data directory"))?;
                fs::create_dir_all(dirs.data_dir())?;
                dirs.data_dir().join("jacks.db")
            }
        };

        info!("Opening database {}", path.display());
        Db::open(path)
    }
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[clap(flatten)]
    store: StoreArgs,
    /// The bank for a new player or a player that is out of money.
    #[clap(long, default_value_t = 1_000)]
    bank: u32,
    /// The pay table full house/flush multipliers.
    #[clap(long, default_value = "9/6")]
    paytable: PayTable,
    /// The milliseconds it takes to turn a card, 0 to turn cards at once.
    #[clap(long, default_value_t = 150)]
    flip_ms: u64,
    /// Seed for a reproducible deck.
    #[clap(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct SimArgs {
    /// The number of hands to play.
    #[clap(long, default_value_t = 1_000)]
    hands: u32,
    /// The coins bet on each hand.
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=5))]
    coins: u8,
    /// The pay table full house/flush multipliers.
    #[clap(long, default_value = "9/6")]
    paytable: PayTable,
    /// Seed for a reproducible deck.
    #[clap(long)]
    seed: Option<u64>,
}

fn init_logger(level: log::LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();
}

/// Loads a player bank, a player that can't cover the smallest bet gets a new bank.
async fn load_bank(db: &Db, name: &str, new_bank: Dollars) -> Result<Dollars> {
    let player = db.get_or_insert_player(name, new_bank).await?;
    if player.bank >= Bet::MIN.amount() {
        return Ok(player.bank);
    }

    warn!("Player {name} is out of money, new bank {new_bank}");
    db.update_bank(name, new_bank).await?;
    Ok(new_bank)
}

async fn play(args: PlayArgs) -> Result<()> {
    let db = args.store.open()?;
    let name = args.store.player;
    let bank = load_bank(&db, &name, Dollars::new(args.bank)).await?;

    let machine = Machine::new(Config {
        bank,
        paytable: args.paytable,
        seed: args.seed,
    });

    terminal::run(machine, db, name, Duration::from_millis(args.flip_ms)).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Play(cli.play)) {
        Command::Play(args) => {
            // Keep the raw terminal clean.
            init_logger(log::LevelFilter::Warn);
            play(args).await
        }
        Command::Payouts { paytable } => {
            report::print_paytable(&paytable);
            Ok(())
        }
        Command::Sim(args) => {
            init_logger(log::LevelFilter::Info);

            let bet = Bet::with_coins(args.coins).unwrap_or(Bet::MAX);
            let config = sim::SimConfig {
                hands: args.hands,
                bet,
                paytable: args.paytable,
                seed: args.seed,
            };

            let res = tokio::task::spawn_blocking(move || sim::run(config)).await??;
            report::print_sim(&res, &args.paytable);
            Ok(())
        }
        Command::Stats(store) => {
            init_logger(log::LevelFilter::Info);

            let db = store.open()?;
            let stats = db.stats(&store.player).await?;
            report::print_stats(&store.player, &stats);
            Ok(())
        }
    }
}
