// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Video poker machine state.
use log::{debug, error};
use rand::{SeedableRng, rngs::StdRng};
use std::mem;
use thiserror::Error;

use jacks_cards::{Card, Deck};

use crate::{
    advisor::{self, Advice},
    bet::Bet,
    money::Dollars,
    paytable::{PayHand, PayTable},
};

/// The number of cards in a hand.
pub const HAND_SIZE: usize = 5;

/// Machine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The starting bank.
    pub bank: Dollars,
    /// The pay table.
    pub paytable: PayTable,
    /// Seed for a reproducible deck, random if none.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank: Dollars::new(1_000),
            paytable: PayTable::default(),
            seed: None,
        }
    }
}

/// A machine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The bet can only change between hands.
    #[error("Bet can't change during a hand")]
    BetLocked,
    /// The bank can't cover the bet.
    #[error("Insufficient funds: bank {bank} bet {bet}")]
    InsufficientFunds {
        /// The bank amount.
        bank: Dollars,
        /// The bet amount.
        bet: Dollars,
    },
    /// Cards are turning.
    #[error("Cards are turning")]
    Busy,
    /// The action is only valid after a deal.
    #[error("No hand to draw to")]
    NotHolding,
    /// A card slot out of range.
    #[error("Invalid card slot {0}")]
    InvalidSlot(usize),
    /// The deck run out of cards.
    #[error("Deck is empty")]
    DeckEmpty,
}

/// A card position on the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    /// The card in this slot if a hand has been dealt.
    pub card: Option<Card>,
    /// The card has been turned.
    pub face_up: bool,
    /// The player holds this card.
    pub held: bool,
}

/// The result of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The final cards.
    pub cards: [Card; HAND_SIZE],
    /// The paying hand.
    pub hand: PayHand,
    /// The hand bet.
    pub bet: Bet,
    /// The amount credited to the bank.
    pub winnings: Dollars,
}

impl Outcome {
    /// Checks if the hand paid.
    pub fn is_win(&self) -> bool {
        self.winnings > Dollars::ZERO
    }

    /// The result message.
    pub fn message(&self) -> String {
        if self.is_win() {
            format!("You win {}", self.winnings)
        } else {
            "Game over".to_string()
        }
    }
}

/// The machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first deal, cards are face down.
    Ready,
    /// Turning the dealt cards.
    Dealing,
    /// Waiting for the player to choose holds and draw.
    Holding,
    /// Turning the drawn cards.
    Drawing,
    /// The hand has been paid.
    Finished(Outcome),
}

impl Phase {
    /// Checks if cards are turning.
    pub fn is_animating(&self) -> bool {
        matches!(self, Phase::Dealing | Phase::Drawing)
    }

    fn is_between_hands(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Finished(_))
    }
}

/// A game event for persisting the machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A hand has been dealt and the bet taken from the bank.
    HandDealt {
        /// The hand bet.
        bet: Bet,
        /// The bank after the bet.
        bank: Dollars,
    },
    /// A hand has been paid.
    HandFinished {
        /// The hand outcome.
        outcome: Outcome,
        /// The bank after the payout.
        bank: Dollars,
    },
}

/// The machine controls state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// The deal/draw button is enabled.
    pub deal_enabled: bool,
    /// The deal/draw button label.
    pub deal_label: &'static str,
    /// The bet one and bet max buttons are enabled.
    pub bet_enabled: bool,
    /// Cards can be held.
    pub holds_enabled: bool,
}

/// A video poker machine.
#[derive(Debug)]
pub struct Machine {
    paytable: PayTable,
    bank: Dollars,
    bet: Bet,
    deck: Deck,
    slots: [Slot; HAND_SIZE],
    phase: Phase,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Machine {
    /// Creates a new machine.
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            paytable: config.paytable,
            bank: config.bank,
            bet: Bet::default(),
            deck: Deck::default(),
            slots: [Slot::default(); HAND_SIZE],
            phase: Phase::Ready,
            events: Vec::default(),
            rng,
        }
    }

    /// The machine phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The bank amount.
    pub fn bank(&self) -> Dollars {
        self.bank
    }

    /// The current bet.
    pub fn bet(&self) -> Bet {
        self.bet
    }

    /// The pay table.
    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// The card slots.
    pub fn slots(&self) -> &[Slot; HAND_SIZE] {
        &self.slots
    }

    /// The last hand outcome if the hand has finished.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Checks if cards are turning.
    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    /// Checks if the bank can't cover the smallest bet.
    pub fn is_bust(&self) -> bool {
        self.phase.is_between_hands() && self.bank < Bet::MIN.amount()
    }

    /// The hand cards, `None` before the first deal.
    pub fn hand(&self) -> Option<[Card; HAND_SIZE]> {
        let mut cards = [self.slots[0].card?; HAND_SIZE];
        for (card, slot) in cards.iter_mut().zip(&self.slots) {
            *card = slot.card?;
        }
        Some(cards)
    }

    /// Removes the events generated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// The state of the machine buttons.
    pub fn controls(&self) -> Controls {
        let deal_label = match self.phase {
            Phase::Holding | Phase::Drawing => "Draw",
            _ => "Deal",
        };

        Controls {
            deal_enabled: !self.phase.is_animating(),
            deal_label,
            bet_enabled: self.phase.is_between_hands(),
            holds_enabled: matches!(self.phase, Phase::Holding),
        }
    }

    /// Bets one more coin wrapping from the maximum bet to one coin.
    pub fn bet_one(&mut self) -> Result<Bet, GameError> {
        self.check_bet_unlocked()?;
        self.bet.bet_one();
        debug!("Bet {}", self.bet);
        Ok(self.bet)
    }

    /// Bets the maximum coins.
    pub fn bet_max(&mut self) -> Result<Bet, GameError> {
        self.check_bet_unlocked()?;
        self.bet.bet_max();
        debug!("Bet {}", self.bet);
        Ok(self.bet)
    }

    /// Presses the deal/draw button.
    pub fn deal_or_draw(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Ready | Phase::Finished(_) => self.deal(),
            Phase::Holding => self.draw(),
            Phase::Dealing | Phase::Drawing => Err(GameError::Busy),
        }
    }

    /// Deals a new hand from a shuffled deck.
    pub fn deal(&mut self) -> Result<(), GameError> {
        self.check_can_deal()?;
        let deck = Deck::new_and_shuffled(&mut self.rng);
        self.deal_from(deck)
    }

    /// Toggles the hold on a card, returns the hold state.
    pub fn toggle_hold(&mut self, idx: usize) -> Result<bool, GameError> {
        if self.phase != Phase::Holding {
            return Err(GameError::NotHolding);
        }

        let slot = self.slots.get_mut(idx).ok_or(GameError::InvalidSlot(idx))?;
        slot.held = !slot.held;
        Ok(slot.held)
    }

    /// Replaces the cards that are not held.
    pub fn draw(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Holding => {}
            Phase::Dealing | Phase::Drawing => return Err(GameError::Busy),
            _ => return Err(GameError::NotHolding),
        }

        for slot in self.slots.iter_mut().filter(|s| !s.held) {
            slot.card = Some(self.deck.deal().ok_or(GameError::DeckEmpty)?);
            slot.face_up = false;
        }

        let held = self.slots.iter().filter(|s| s.held).count();
        debug!("Drawing {} cards", HAND_SIZE - held);

        self.phase = Phase::Drawing;
        Ok(())
    }

    /// Turns the next face down card, returns false if there was nothing to do.
    pub fn tick(&mut self) -> bool {
        if !self.phase.is_animating() {
            return false;
        }

        if let Some(slot) = self.slots.iter_mut().find(|s| !s.face_up) {
            slot.face_up = true;
        }

        if self.slots.iter().all(|s| s.face_up) {
            match self.phase {
                Phase::Dealing => self.phase = Phase::Holding,
                Phase::Drawing => self.pay(),
                _ => {}
            }
        }

        true
    }

    /// Turns all the cards.
    pub fn settle(&mut self) {
        while self.tick() {}
    }

    /// Computes the best holds for the current hand.
    ///
    /// This enumerates all draws for each hold and may take a while.
    pub fn advise(&self) -> Option<Advice> {
        if self.phase != Phase::Holding {
            return None;
        }

        self.hand()
            .map(|cards| advisor::advise(&cards, &self.paytable, self.bet))
    }

    /// Applies holds to the current hand.
    pub fn set_holds(&mut self, holds: [bool; HAND_SIZE]) -> Result<(), GameError> {
        if self.phase != Phase::Holding {
            return Err(GameError::NotHolding);
        }

        for (slot, held) in self.slots.iter_mut().zip(holds) {
            slot.held = held;
        }

        Ok(())
    }

    fn check_bet_unlocked(&self) -> Result<(), GameError> {
        if self.phase.is_between_hands() {
            Ok(())
        } else {
            Err(GameError::BetLocked)
        }
    }

    fn check_can_deal(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Ready | Phase::Finished(_) => {}
            Phase::Dealing | Phase::Drawing => return Err(GameError::Busy),
            Phase::Holding => return Err(GameError::BetLocked),
        }

        let bet = self.bet.amount();
        if self.bank < bet {
            return Err(GameError::InsufficientFunds {
                bank: self.bank,
                bet,
            });
        }

        Ok(())
    }

    fn deal_from(&mut self, mut deck: Deck) -> Result<(), GameError> {
        self.check_can_deal()?;

        let mut slots = [Slot::default(); HAND_SIZE];
        for slot in slots.iter_mut() {
            slot.card = Some(deck.deal().ok_or(GameError::DeckEmpty)?);
        }

        self.deck = deck;
        self.slots = slots;
        self.bank -= self.bet.amount();
        self.phase = Phase::Dealing;

        debug!("Dealt hand with bet {} bank {}", self.bet, self.bank);
        self.events.push(GameEvent::HandDealt {
            bet: self.bet,
            bank: self.bank,
        });

        Ok(())
    }

    fn pay(&mut self) {
        let Some(cards) = self.hand() else {
            error!("Paying a hand with missing cards");
            self.phase = Phase::Ready;
            return;
        };

        let hand = PayHand::classify(&cards);
        let winnings = self.paytable.winnings(hand, self.bet);
        self.bank += winnings;

        let outcome = Outcome {
            cards,
            hand,
            bet: self.bet,
            winnings,
        };

        debug!(
            "{} {} bank {}",
            cards.map(|c| c.to_string()).join(" "),
            outcome.message(),
            self.bank
        );

        self.phase = Phase::Finished(outcome);
        self.events.push(GameEvent::HandFinished {
            outcome,
            bank: self.bank,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    // A deck that deals the given cards first.
    fn stacked(s: &str) -> Deck {
        let top = cards(s);
        Deck::default()
            .into_iter()
            .filter(|c| !top.contains(c))
            .chain(top.iter().rev().copied())
            .collect()
    }

    fn new_machine() -> Machine {
        Machine::new(Config {
            seed: Some(13),
            ..Config::default()
        })
    }

    #[test]
    fn cycles_bets() {
        let mut machine = new_machine();
        assert_eq!(machine.bet().to_string(), "$5");

        let amounts = (0..5)
            .map(|_| machine.bet_one().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(amounts, ["$10", "$15", "$20", "$25", "$5"]);

        assert_eq!(machine.bet_max().unwrap().to_string(), "$25");
    }

    #[test]
    fn plays_a_full_hand() {
        let mut machine = new_machine();
        let bank = machine.bank();
        let bet = machine.bet().amount();

        // Five cards face down.
        assert_eq!(machine.phase(), Phase::Ready);
        assert!(machine.slots().iter().all(|s| !s.face_up));
        assert_eq!(machine.controls().deal_label, "Deal");

        machine.deal_or_draw().unwrap();
        assert_eq!(machine.bank(), bank - bet);

        // Everything is disabled while cards turn.
        let controls = machine.controls();
        assert!(!controls.deal_enabled);
        assert!(!controls.bet_enabled);
        assert!(!controls.holds_enabled);
        assert_eq!(machine.deal_or_draw(), Err(GameError::Busy));
        assert_eq!(machine.bet_one(), Err(GameError::BetLocked));

        // Cards turn one at a time.
        for turned in 1..=HAND_SIZE {
            assert!(machine.tick());
            let face_up = machine.slots().iter().filter(|s| s.face_up).count();
            assert_eq!(face_up, turned);
        }

        // Deal is active again as a draw, bets are disabled.
        assert_eq!(machine.phase(), Phase::Holding);
        let controls = machine.controls();
        assert!(controls.deal_enabled);
        assert_eq!(controls.deal_label, "Draw");
        assert!(!controls.bet_enabled);
        assert!(controls.holds_enabled);
        assert_eq!(machine.bet_max(), Err(GameError::BetLocked));

        machine.deal_or_draw().unwrap();
        assert!(!machine.controls().deal_enabled);
        machine.settle();

        let outcome = *machine.outcome().unwrap();
        assert_eq!(machine.bank(), bank - bet + outcome.winnings);
        if outcome.is_win() {
            assert!(outcome.message().starts_with("You win"));
        } else {
            assert_eq!(outcome.message(), "Game over");
        }

        let controls = machine.controls();
        assert!(controls.deal_enabled);
        assert!(controls.bet_enabled);
        assert_eq!(controls.deal_label, "Deal");

        let events = machine.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::HandDealt { .. }));
        assert!(matches!(events[1], GameEvent::HandFinished { outcome: o, .. } if o == outcome));
        assert!(machine.take_events().is_empty());
    }

    #[test]
    fn holds_and_pays() {
        let mut machine = new_machine();
        machine.bet_max().unwrap();

        // Hold the four hearts and draw the royal flush.
        let deck = stacked("AH KH QH 2C JH TH");
        machine.deal_from(deck).unwrap();
        assert_eq!(machine.toggle_hold(0), Err(GameError::NotHolding));
        machine.settle();

        assert_eq!(machine.hand(), Some(cards("AH KH QH 2C JH").try_into().unwrap()));
        for idx in [0, 1, 2, 4] {
            assert!(machine.toggle_hold(idx).unwrap());
        }
        assert_eq!(machine.toggle_hold(5), Err(GameError::InvalidSlot(5)));

        machine.draw().unwrap();
        assert!(!machine.slots()[3].face_up);
        assert!(machine.slots()[0].face_up);
        machine.settle();

        let outcome = machine.outcome().unwrap();
        assert_eq!(outcome.hand, PayHand::RoyalFlush);
        assert_eq!(outcome.winnings, Dollars::new(20_000));
        assert_eq!(outcome.message(), "You win $20,000");
        assert_eq!(machine.bank(), Dollars::new(1_000 - 25 + 20_000));
    }

    #[test]
    fn jacks_or_better_returns_the_bet() {
        let mut machine = new_machine();
        let bank = machine.bank();

        machine.deal_from(stacked("JS JH 3D 7C 9S")).unwrap();
        machine.settle();
        machine.set_holds([true; HAND_SIZE]).unwrap();
        machine.draw().unwrap();
        machine.settle();

        let outcome = machine.outcome().unwrap();
        assert_eq!(outcome.hand, PayHand::JacksOrBetter);
        assert_eq!(outcome.message(), "You win $5");
        assert_eq!(machine.bank(), bank);
    }

    #[test]
    fn losing_hand() {
        let mut machine = new_machine();
        let bank = machine.bank();

        machine.deal_from(stacked("2S 5H 8D TC KS 3C 4D 9H 6C QD")).unwrap();
        machine.settle();
        machine.draw().unwrap();
        machine.settle();

        let outcome = machine.outcome().unwrap();
        assert_eq!(outcome.cards.to_vec(), cards("3C 4D 9H 6C QD"));
        assert_eq!(outcome.hand, PayHand::Zilch);
        assert!(!outcome.is_win());
        assert_eq!(outcome.message(), "Game over");
        assert_eq!(machine.bank(), bank - Bet::MIN.amount());
    }

    #[test]
    fn insufficient_funds() {
        let mut machine = Machine::new(Config {
            bank: Dollars::new(20),
            seed: Some(7),
            ..Config::default()
        });

        machine.bet_max().unwrap();
        assert_eq!(
            machine.deal(),
            Err(GameError::InsufficientFunds {
                bank: Dollars::new(20),
                bet: Dollars::new(25),
            })
        );
        assert_eq!(machine.phase(), Phase::Ready);
        assert!(!machine.is_bust());

        // Lose four hands at one coin.
        machine.bet_one().unwrap();
        for _ in 0..4 {
            machine.deal_from(stacked("2S 5H 8D TC KS 3C 4D 9H 6C QD")).unwrap();
            machine.settle();
            machine.draw().unwrap();
            machine.settle();
        }

        assert_eq!(machine.bank(), Dollars::ZERO);
        assert!(machine.is_bust());
        assert!(matches!(
            machine.deal(),
            Err(GameError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn draw_requires_a_hand() {
        let mut machine = new_machine();
        assert_eq!(machine.draw(), Err(GameError::NotHolding));
        assert!(!machine.tick());
        assert!(machine.advise().is_none());
    }

    #[test]
    fn seeded_machines_deal_the_same_cards() {
        let mut m1 = new_machine();
        let mut m2 = new_machine();

        for _ in 0..3 {
            for m in [&mut m1, &mut m2] {
                m.deal().unwrap();
                m.settle();
                m.draw().unwrap();
                m.settle();
            }

            assert_eq!(m1.hand(), m2.hand());
            assert_eq!(m1.bank(), m2.bank());
        }
    }

    #[test]
    fn advise_holds() {
        let mut machine = new_machine();
        machine.deal_from(stacked("JS JH 3D 7C 9S")).unwrap();
        assert!(machine.advise().is_none());
        machine.settle();

        let advice = machine.advise().unwrap();
        assert_eq!(advice.holds, [true, true, false, false, false]);

        machine.set_holds(advice.holds).unwrap();
        assert!(machine.slots()[0].held && !machine.slots()[2].held);
    }
}
