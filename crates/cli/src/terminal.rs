// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal I/O.
use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute, queue,
    style::{self, StyledContent, Stylize},
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use log::debug;
use std::{io, time::Duration};
use tokio::time::{self, MissedTickBehavior};

use jacks_core::{Advice, GameError, GameEvent, Machine, Phase, Slot, advisor, db::Db};

/// The width of a card on screen.
const CARD_WIDTH: u16 = 9;

/// Runs the terminal loop.
pub async fn run(machine: Machine, db: Db, player: String, flip: Duration) -> Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;

    let mut game = Game {
        machine,
        db,
        player,
        hint: None,
        show_pays: true,
        message: None,
    };

    let res = game.run(&mut stdout, flip).await;

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        cursor::Show
    )?;
    disable_raw_mode()?;

    res
}

/// The terminal game state.
struct Game {
    machine: Machine,
    db: Db,
    player: String,
    hint: Option<Advice>,
    show_pays: bool,
    message: Option<String>,
}

impl Game {
    async fn run(&mut self, w: &mut impl io::Write, flip: Duration) -> Result<()> {
        let mut reader = EventStream::new();
        let mut ticker = time::interval(flip.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.print(w)?;

        loop {
            tokio::select! {
                // Turn the next card.
                _ = ticker.tick(), if self.machine.is_animating() => {
                    self.machine.tick();
                    self.persist().await;
                    self.print(w)?;
                },
                // We have received an event from the terminal.
                res = reader.next() => match res {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if !self.handle_key(key.code).await? {
                            break;
                        }

                        if flip.is_zero() {
                            self.machine.settle();
                        }

                        self.persist().await;
                        self.print(w)?;
                    }
                    Some(Ok(Event::Resize(..))) => self.print(w)?,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
            };
        }

        Ok(())
    }

    /// Handles a key press, returns false if the player quits.
    async fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char('b') => {
                let res = self.machine.bet_one().map(|_| ());
                self.report(res);
            }
            KeyCode::Char('m') => {
                let res = self.machine.bet_max().map(|_| ());
                self.report(res);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let res = self.machine.deal_or_draw();
                if res.is_ok() {
                    self.hint = None;
                }
                self.report(res);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                let res = self.machine.toggle_hold(idx).map(|_| ());
                self.report(res);
            }
            KeyCode::Char('h') => self.advise().await?,
            KeyCode::Char('p') => self.show_pays = !self.show_pays,
            _ => {}
        }

        Ok(true)
    }

    /// Shows an error for a rejected action, keys for disabled buttons are ignored.
    fn report(&mut self, res: Result<(), GameError>) {
        match res {
            Ok(()) => self.message = None,
            Err(e @ GameError::InsufficientFunds { .. }) => self.message = Some(e.to_string()),
            Err(e) => debug!("Ignored key: {e}"),
        }
    }

    async fn advise(&mut self) -> Result<()> {
        if self.machine.phase() != Phase::Holding {
            return Ok(());
        }

        if let Some(cards) = self.machine.hand() {
            let paytable = *self.machine.paytable();
            let bet = self.machine.bet();
            let advice =
                tokio::task::spawn_blocking(move || advisor::advise(&cards, &paytable, bet))
                    .await?;
            self.hint = Some(advice);
        }

        Ok(())
    }

    /// Stores the machine events to the database.
    async fn persist(&mut self) {
        for event in self.machine.take_events() {
            let res = match event {
                GameEvent::HandDealt { bank, .. } => self.db.update_bank(&self.player, bank).await,
                GameEvent::HandFinished { outcome, bank } => {
                    self.db.record_hand(&self.player, outcome, bank).await
                }
            };

            if let Err(e) = res {
                // The screen is in raw mode, errors go to the status line.
                debug!("Database error {e}");
                self.message = Some(format!("Database error {e}"));
            }
        }
    }

    fn print(&self, w: &mut impl io::Write) -> Result<()> {
        queue!(w, Clear(ClearType::All))?;

        let title = format!("JACKS OR BETTER {}", self.machine.paytable());
        print_at(w, 2, 1, title.bold())?;

        let mut row = 3;
        if self.show_pays {
            row = self.print_pays(w, row)?;
        }

        self.print_cards(w, row)?;
        row += 8;

        print_at(w, 2, row, self.status_line())?;
        row += 2;

        let bank = format!("BANK {}", self.machine.bank());
        let bet = format!("BET {}", self.machine.bet());
        print_at(w, 2, row, bank.bold().yellow())?;
        print_at(w, 2 + 5 * CARD_WIDTH - bet.len() as u16, row, bet.bold().yellow())?;
        row += 2;

        self.print_buttons(w, row)?;

        w.flush()?;
        Ok(())
    }

    fn print_pays(&self, w: &mut impl io::Write, mut row: u16) -> Result<u16> {
        let paytable = self.machine.paytable();
        let coins = self.machine.bet().coins() as usize;

        for pay in paytable.rows() {
            print_at(w, 2, row, format!("{:<16}", pay.hand.label()).stylize())?;
            for (idx, amount) in pay.coins.iter().enumerate() {
                let text = format!("{amount:>6}");
                let text = if idx + 1 == coins {
                    text.reverse()
                } else {
                    text.stylize()
                };
                print_at(w, 18 + idx as u16 * 6, row, text)?;
            }
            row += 1;
        }

        Ok(row + 1)
    }

    fn print_cards(&self, w: &mut impl io::Write, row: u16) -> Result<()> {
        let hint = self.hint.map(|a| a.holds).unwrap_or_default();

        for (idx, slot) in self.machine.slots().iter().enumerate() {
            let col = 2 + idx as u16 * CARD_WIDTH;
            for (line, text) in card_lines(slot).into_iter().enumerate() {
                print_at(w, col, row + line as u16, text)?;
            }

            let label = if slot.held {
                " HELD ".bold().green()
            } else if self.hint.is_some() && hint[idx] {
                " hold ".dark_green()
            } else {
                "      ".stylize()
            };
            print_at(w, col + 1, row + 5, label)?;
            print_at(w, col + 2, row + 6, format!("[{}]", idx + 1).dark_grey())?;
        }

        Ok(())
    }

    fn status_line(&self) -> StyledContent<String> {
        if let Some(message) = &self.message {
            return message.clone().red();
        }

        match self.machine.phase() {
            Phase::Ready => "Press space to deal".to_string().stylize(),
            Phase::Holding => match self.hint {
                Some(advice) => format!(
                    "Hint: hold the marked cards, expected payout ${:.2}",
                    advice.expected_dollars()
                )
                .dark_green(),
                None => "Choose cards to hold and press space to draw"
                    .to_string()
                    .stylize(),
            },
            Phase::Finished(outcome) if self.machine.is_bust() => {
                format!("{}, you are out of money", outcome.message()).red()
            }
            Phase::Finished(outcome) if outcome.is_win() => {
                format!("{}! {}", outcome.message().to_uppercase(), outcome.hand)
                    .bold()
                    .green()
            }
            Phase::Finished(outcome) => outcome.message().to_uppercase().bold().red(),
            Phase::Dealing | Phase::Drawing => String::new().stylize(),
        }
    }

    fn print_buttons(&self, w: &mut impl io::Write, row: u16) -> Result<()> {
        let controls = self.machine.controls();
        let buttons = [
            ("[B] Bet One", controls.bet_enabled),
            ("[M] Bet Max", controls.bet_enabled),
            (
                if controls.deal_label == "Draw" {
                    "[Space] Draw"
                } else {
                    "[Space] Deal"
                },
                controls.deal_enabled,
            ),
            ("[1-5] Hold", controls.holds_enabled),
            ("[H] Hint", controls.holds_enabled),
            ("[P] Pays", true),
            ("[Q] Quit", true),
        ];

        let mut col = 2;
        for (label, enabled) in buttons {
            let text = if enabled {
                label.bold()
            } else {
                label.dark_grey()
            };
            print_at(w, col, row, text)?;
            col += label.len() as u16 + 2;
        }

        Ok(())
    }
}

/// The lines for a card, face down cards show the back.
fn card_lines(slot: &Slot) -> [StyledContent<String>; 5] {
    let top = "┌─────┐".to_string().stylize();
    let bottom = "└─────┘".to_string().stylize();

    match slot.card {
        Some(card) if slot.face_up => {
            let rank = card.rank().to_string();
            let suit = card.suit();
            let paint = |s: String| {
                if suit.is_red() {
                    s.red()
                } else {
                    s.white()
                }
            };

            [
                top,
                paint(format!("│{rank:<5}│")),
                paint(format!("│  {}  │", suit.symbol())),
                paint(format!("│{rank:>5}│")),
                bottom,
            ]
        }
        _ => {
            let back = || "│░░░░░│".to_string().blue();
            [top, back(), back(), back(), bottom]
        }
    }
}

fn print_at<T: std::fmt::Display>(
    w: &mut impl io::Write,
    col: u16,
    row: u16,
    text: StyledContent<T>,
) -> Result<()> {
    queue!(w, cursor::MoveTo(col, row), style::PrintStyledContent(text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jacks_core::{Card, Config};

    #[test]
    fn face_down_card_shows_back() {
        let slot = Slot {
            card: Some(Card::new(jacks_core::Rank::Ace, jacks_core::Suit::Hearts)),
            face_up: false,
            held: false,
        };

        let lines = card_lines(&slot);
        assert_eq!(lines[1].content(), "│░░░░░│");
    }

    #[test]
    fn face_up_card_shows_rank_and_suit() {
        let slot = Slot {
            card: Some("TD".parse::<Card>().unwrap()),
            face_up: true,
            held: true,
        };

        let lines = card_lines(&slot);
        assert_eq!(lines[1].content(), "│T    │");
        assert_eq!(lines[2].content(), "│  ♦  │");
        assert_eq!(lines[3].content(), "│    T│");
    }

    #[tokio::test]
    async fn persists_finished_hands() {
        let db = Db::open_in_memory().unwrap();
        let player = db
            .get_or_insert_player("alice", jacks_core::Dollars::new(1_000))
            .await
            .unwrap();

        let machine = Machine::new(Config {
            seed: Some(3),
            ..Config::default()
        });

        let mut game = Game {
            machine,
            db: db.clone(),
            player: player.name,
            hint: None,
            show_pays: false,
            message: None,
        };

        assert!(game.handle_key(KeyCode::Char(' ')).await.unwrap());
        game.machine.settle();
        assert!(game.handle_key(KeyCode::Enter).await.unwrap());
        game.machine.settle();
        game.persist().await;

        let stats = db.stats("alice").await.unwrap();
        assert_eq!(stats.hands, 1);

        let stored = db
            .get_or_insert_player("alice", jacks_core::Dollars::ZERO)
            .await
            .unwrap();
        assert_eq!(stored.bank, game.machine.bank());

        assert!(!game.handle_key(KeyCode::Char('q')).await.unwrap());
    }

    #[tokio::test]
    async fn database_errors_go_to_the_status_line() {
        // The player row doesn't exist, storing the bank fails.
        let mut game = Game {
            machine: Machine::new(Config::default()),
            db: Db::open_in_memory().unwrap(),
            player: "nobody".to_string(),
            hint: None,
            show_pays: false,
            message: None,
        };

        assert!(game.handle_key(KeyCode::Char(' ')).await.unwrap());
        game.persist().await;

        let message = game.message.clone().unwrap();
        assert!(message.starts_with("Database error"), "{message}");
        assert_eq!(game.status_line().content(), &message);
    }
}
