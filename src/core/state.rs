//! The game state machine.
//!
//! ## Phases
//!
//! `Dealing -> Playing -> (Drawing) -> Playing -> ... -> Terminal`
//!
//! - `Dealing`: deck shuffled and first card flipped, hands being dealt.
//! - `Playing`: the active player must play a legal card, or draw when
//!   there is none.
//! - `Drawing`: the active player drew a playable card and must play it.
//! - `Terminal`: a hand emptied, the deck ran out, or the turn limit hit.
//!   Every mutating call fails with `GameOver`.
//!
//! ## PlayerView
//!
//! What the active player may legitimately see when choosing a move: their
//! own hand plus public information.
//!
//! ## GameState
//!
//! Owns the draw pile, discard pile, hands and RNG. Nothing else mutates
//! them. `im::Vector` keeps the turn history cheap to clone.

use im::Vector;
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::action::{Move, TurnEvent, TurnRecord};
use super::config::{DrawRule, ExhaustionRule, RuleConfig};
use super::error::{Result, UnoError};
use super::player::{Direction, PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use crate::agents::Agent;
use crate::cards::{build_deck, count_cards, Card, Color, Deck, DiscardPile};
use crate::rules::{self, GameOutcome, TerminalReason};

/// A deferred consequence waiting on the active player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingEffect {
    #[default]
    None,
    /// Accumulated draw penalty (stacking only).
    Draw { amount: u32 },
}

impl PendingEffect {
    /// Cards owed, 0 when nothing is pending.
    #[must_use]
    pub const fn draw_amount(self) -> u32 {
        match self {
            PendingEffect::None => 0,
            PendingEffect::Draw { amount } => amount,
        }
    }
}

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Dealing,
    Playing,
    /// The active player drew `drawn` and may only play that card.
    Drawing { drawn: Card },
    Terminal(GameOutcome),
}

/// Read-only view handed to agents.
#[derive(Clone, Debug)]
pub struct PlayerView<'a> {
    /// The acting player.
    pub player: PlayerId,
    /// The acting player's hand.
    pub hand: &'a [Card],
    pub top_card: Card,
    /// Color in force (declared color when the top card is wild).
    pub active_color: Color,
    pub direction: Direction,
    /// Penalty the player faces unless they stack.
    pub pending_draw: u32,
    /// Hand sizes of every player.
    pub hand_sizes: PlayerMap<usize>,
    pub draw_pile_size: usize,
    /// Current turn number (starts at 1).
    pub turn: u32,
}

/// A prearranged table, for puzzles and reproductions.
///
/// The cards listed here replace the shuffled deck entirely; the
/// configured composition is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// One hand per seat.
    pub hands: Vec<Vec<Card>>,

    /// Face-up card starting the discard pile. Must be colored.
    pub first_card: Option<Card>,

    /// Draw pile, bottom first.
    pub draw_pile: Vec<Card>,
}

impl Deal {
    #[must_use]
    pub fn new(first_card: Card) -> Self {
        Self {
            first_card: Some(first_card),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hand(mut self, hand: impl IntoIterator<Item = Card>) -> Self {
        self.hands.push(hand.into_iter().collect());
        self
    }

    /// Set the draw pile, top card last.
    #[must_use]
    pub fn with_draw_pile(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.draw_pile = cards.into_iter().collect();
        self
    }
}

/// Full state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    config: RuleConfig,
    deck: Deck,
    discard: DiscardPile,
    hands: PlayerMap<Vec<Card>>,
    active: PlayerId,
    direction: Direction,
    active_color: Color,
    pending: PendingEffect,
    phase: Phase,
    turns_played: u32,
    sequence: u32,
    history: Vector<TurnRecord>,
    hand_size_trace: Vector<PlayerMap<usize>>,
    rng: GameRng,
}

impl GameState {
    /// Build, shuffle, flip and deal a new game.
    ///
    /// Player 0 starts, playing clockwise. The first card's effect is not
    /// applied.
    pub fn new(config: RuleConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = GameRng::new(seed).for_context("deck");
        let mut deck = build_deck(&config.composition)?;
        deck.shuffle(&mut rng);

        let first = flip_first_card(&mut deck, &mut rng)?;
        let player_count = config.player_count;

        let mut state = Self {
            deck,
            discard: DiscardPile::new(first),
            hands: PlayerMap::with_default(player_count),
            active: PlayerId::new(0),
            direction: Direction::Clockwise,
            active_color: first.color(),
            pending: PendingEffect::None,
            phase: Phase::Dealing,
            turns_played: 0,
            sequence: 0,
            history: Vector::new(),
            hand_size_trace: Vector::new(),
            rng,
            config,
        };

        state.deal()?;
        debug!(
            "New game: {player_count} players, seed {seed}, first card {first}, {} card(s) in the draw pile",
            state.deck.len()
        );
        Ok(state)
    }

    /// Start from a prearranged table instead of a shuffled deck.
    ///
    /// `seed` drives reshuffles of the discard pile.
    pub fn from_deal(config: RuleConfig, deal: Deal, seed: u64) -> Result<Self> {
        config.validate()?;

        if deal.hands.len() != config.player_count {
            return Err(UnoError::InvalidConfiguration(format!(
                "deal has {} hand(s) for {} players",
                deal.hands.len(),
                config.player_count
            )));
        }
        let first = match deal.first_card {
            Some(card) if !card.is_wild() => card,
            _ => {
                return Err(UnoError::InvalidConfiguration(
                    "deal needs a colored first card".to_string(),
                ))
            }
        };

        let mut hands = deal.hands.into_iter();
        let mut state = Self {
            deck: Deck::from_cards(deal.draw_pile),
            discard: DiscardPile::new(first),
            hands: PlayerMap::new(config.player_count, |_| hands.next().unwrap_or_default()),
            active: PlayerId::new(0),
            direction: Direction::Clockwise,
            active_color: first.color(),
            pending: PendingEffect::None,
            phase: Phase::Playing,
            turns_played: 0,
            sequence: 0,
            history: Vector::new(),
            hand_size_trace: Vector::new(),
            rng: GameRng::new(seed).for_context("deck"),
            config,
        };

        state.record_hand_sizes();
        Ok(state)
    }

    fn deal(&mut self) -> Result<()> {
        for _ in 0..self.config.hand_size {
            for player in PlayerId::all(self.player_count()) {
                let card = self
                    .deck
                    .pop_top()
                    .ok_or(UnoError::DeckExhausted { requested: 1, available: 0 })?;
                self.hands[player].push(card);
            }
        }

        self.phase = Phase::Playing;
        self.record_hand_sizes();
        Ok(())
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Terminal(_))
    }

    /// How the game ended, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn active_color(&self) -> Color {
        self.active_color
    }

    #[must_use]
    pub fn pending(&self) -> PendingEffect {
        self.pending
    }

    #[must_use]
    pub fn top_card(&self) -> Card {
        self.discard.top()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    #[must_use]
    pub fn hand_sizes(&self) -> PlayerMap<usize> {
        self.hands.map(Vec::len)
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn discard(&self) -> &DiscardPile {
        &self.discard
    }

    /// Turns completed so far.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Every event since the deal, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    /// Hand sizes after the deal and after every turn, when
    /// `record_hand_sizes` is on.
    #[must_use]
    pub fn hand_size_trace(&self) -> &Vector<PlayerMap<usize>> {
        &self.hand_size_trace
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Every card on the table: draw pile, discard pile, then hands.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.deck
            .cards()
            .iter()
            .chain(self.discard.cards())
            .chain(self.hands.values().flatten())
            .copied()
    }

    /// Multiset of every card on the table.
    #[must_use]
    pub fn card_counts(&self) -> FxHashMap<Card, usize> {
        count_cards(self.all_cards())
    }

    /// What `player` sees.
    #[must_use]
    pub fn view(&self, player: PlayerId) -> PlayerView<'_> {
        PlayerView {
            player,
            hand: &self.hands[player],
            top_card: self.top_card(),
            active_color: self.active_color,
            direction: self.direction,
            pending_draw: self.pending.draw_amount(),
            hand_sizes: self.hand_sizes(),
            draw_pile_size: self.deck.len(),
            turn: self.turns_played + 1,
        }
    }

    /// Legal plays for the active player.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(self, self.active)
    }

    // === Transitions ===

    /// Play `mv` for `player`.
    ///
    /// Fails with `IllegalMove` (state untouched) unless `mv` is in the
    /// current legal set.
    pub fn apply_move(&mut self, player: PlayerId, mv: Move) -> Result<()> {
        self.ensure_turn(player)?;
        if !rules::is_legal(self, player, &mv) {
            return Err(UnoError::IllegalMove { player, mv });
        }

        let hand = &mut self.hands[player];
        let position = hand
            .iter()
            .position(|&card| card == mv.card)
            .ok_or(UnoError::IllegalMove { player, mv })?;
        hand.remove(position);

        self.discard.push(mv.card);
        self.active_color = mv.effective_color();
        self.phase = Phase::Playing;
        self.record(player, TurnEvent::Played(mv));
        trace!("{player} plays {mv}, {} card(s) left", self.hands[player].len());

        let previous_pending = std::mem::take(&mut self.pending);

        if self.hands[player].is_empty() {
            self.finish_with_winner(player, mv.card, previous_pending);
            return Ok(());
        }

        let resolution = rules::resolve_effect(mv.card, &self.config, self.direction, previous_pending);
        self.direction = resolution.direction;
        self.pending = resolution.pending;

        let next = self.next_player(player, 1);
        if let Some(amount) = resolution.immediate_penalty {
            if !self.draw_penalty(next, amount)? {
                return Ok(());
            }
        } else if resolution.skip_next {
            trace!("{next} is skipped");
            self.record(next, TurnEvent::Skipped);
        }

        let steps = if resolution.skip_next { 2 } else { 1 };
        self.end_turn(self.next_player(player, steps));
        Ok(())
    }

    /// Draw for `player`, who has no legal play.
    ///
    /// A pending penalty is drawn in full and the turn passes. Otherwise the
    /// configured `DrawRule` applies. Fails with `DrawNotAllowed` while the
    /// player still has a legal play.
    pub fn draw_for_turn(&mut self, player: PlayerId) -> Result<()> {
        self.ensure_turn(player)?;
        if matches!(self.phase, Phase::Drawing { .. }) || !self.legal_moves().is_empty() {
            return Err(UnoError::DrawNotAllowed { player });
        }

        if let PendingEffect::Draw { amount } = self.pending {
            if self.draw_penalty(player, amount)? {
                self.pending = PendingEffect::None;
                self.end_turn(self.next_player(player, 1));
            }
            return Ok(());
        }

        match self.config.draw_rule {
            DrawRule::PassAfterDraw => {
                if self.draw_one(player)?.is_some() {
                    self.record(player, TurnEvent::Drew { count: 1, playable: false });
                    self.end_turn(self.next_player(player, 1));
                }
            }
            DrawRule::PlayDrawn => {
                if let Some(card) = self.draw_one(player)? {
                    let playable = self.is_playable(card);
                    self.record(player, TurnEvent::Drew { count: 1, playable });
                    if playable {
                        self.phase = Phase::Drawing { drawn: card };
                    } else {
                        self.end_turn(self.next_player(player, 1));
                    }
                }
            }
            DrawRule::DrawUntilPlayable => {
                let mut count = 0;
                loop {
                    let Some(card) = self.draw_one(player)? else {
                        if count > 0 {
                            self.record(player, TurnEvent::Drew { count, playable: false });
                        }
                        break;
                    };
                    count += 1;
                    if self.is_playable(card) {
                        self.record(player, TurnEvent::Drew { count, playable: true });
                        self.phase = Phase::Drawing { drawn: card };
                        break;
                    }
                }
            }
        }

        trace!("{player} drew, now holding {} card(s)", self.hands[player].len());
        Ok(())
    }

    /// Play one decision for the active player using `agents` (one per seat).
    ///
    /// Forces a draw when there is nothing to play; if the drawn card is
    /// playable the agent is asked to play it. The agent's answer must be
    /// one of the moves offered, else `InvalidAgentResponse`.
    pub fn step(&mut self, agents: &mut [Box<dyn Agent>]) -> Result<()> {
        if self.is_terminal() {
            return Err(UnoError::GameOver);
        }
        if agents.len() != self.player_count() {
            return Err(UnoError::InvalidConfiguration(format!(
                "{} agent(s) for {} players",
                agents.len(),
                self.player_count()
            )));
        }

        let player = self.active;
        let mut legal = self.legal_moves();
        if legal.is_empty() {
            self.draw_for_turn(player)?;
            if !matches!(self.phase, Phase::Drawing { .. }) {
                return Ok(());
            }
            legal = self.legal_moves();
        }

        let agent = &mut agents[player.index()];
        let mv = agent.choose_move(&self.view(player), &legal);
        if !legal.contains(&mv) {
            return Err(UnoError::InvalidAgentResponse {
                player,
                agent: agent.name().to_string(),
                mv,
            });
        }

        self.apply_move(player, mv)
    }

    // === Internals ===

    fn ensure_turn(&self, player: PlayerId) -> Result<()> {
        if self.is_terminal() {
            return Err(UnoError::GameOver);
        }
        if player != self.active {
            return Err(UnoError::NotYourTurn {
                player,
                active: self.active,
            });
        }
        Ok(())
    }

    fn next_player(&self, from: PlayerId, steps: usize) -> PlayerId {
        from.step(self.direction, steps, self.player_count())
    }

    fn is_playable(&self, card: Card) -> bool {
        card.matches(self.top_card(), self.active_color)
    }

    fn draw_into(&mut self, player: PlayerId, count: usize) -> Result<()> {
        let cards = self.deck.draw(count, &mut self.discard, &mut self.rng)?;
        self.hands[player].extend(cards);
        Ok(())
    }

    /// Draw one card. `None` means the deck ran out and the game ended.
    fn draw_one(&mut self, player: PlayerId) -> Result<Option<Card>> {
        match self.deck.draw(1, &mut self.discard, &mut self.rng) {
            Ok(cards) => {
                let Some(&card) = cards.first() else {
                    return Ok(None);
                };
                self.hands[player].push(card);
                Ok(Some(card))
            }
            Err(err) => {
                self.on_exhausted(err)?;
                Ok(None)
            }
        }
    }

    /// Make `victim` draw a penalty. `false` means the deck ran out and the
    /// game ended.
    fn draw_penalty(&mut self, victim: PlayerId, amount: u32) -> Result<bool> {
        let count = amount as usize;
        match self.draw_into(victim, count) {
            Ok(()) => {
                trace!("{victim} draws {count} and loses the turn");
                self.record(victim, TurnEvent::PenaltyDrawn { count });
                Ok(true)
            }
            Err(err) => {
                self.on_exhausted(err)?;
                Ok(false)
            }
        }
    }

    fn on_exhausted(&mut self, err: UnoError) -> Result<()> {
        match (err, self.config.exhaustion) {
            (UnoError::DeckExhausted { .. }, ExhaustionRule::EndInDraw) => {
                self.finish(GameOutcome::no_winner(TerminalReason::DeckExhausted));
                Ok(())
            }
            (err, _) => Err(err),
        }
    }

    fn finish_with_winner(&mut self, player: PlayerId, last: Card, previous_pending: PendingEffect) {
        if let Some(amount) = last.rank().draw_amount() {
            if self.config.penalty_on_final_draw_card {
                let victim = self.next_player(player, 1);
                let count = (previous_pending.draw_amount() + amount) as usize;
                match self.draw_into(victim, count) {
                    Ok(()) => self.record(victim, TurnEvent::PenaltyDrawn { count }),
                    Err(err) => {
                        warn!("{victim} cannot draw the final penalty: {err}");
                        self.record(victim, TurnEvent::PenaltyVoided { count });
                    }
                }
            }
        }

        self.finish(GameOutcome::winner(player));
    }

    fn end_turn(&mut self, next: PlayerId) {
        self.turns_played += 1;
        self.sequence = 0;
        self.active = next;
        self.record_hand_sizes();

        if self.turns_played >= self.config.turn_limit {
            debug!("Turn limit {} reached", self.config.turn_limit);
            self.phase = Phase::Terminal(GameOutcome::no_winner(TerminalReason::TurnLimit));
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.turns_played += 1;
        self.sequence = 0;
        self.record_hand_sizes();
        self.phase = Phase::Terminal(outcome);

        match outcome.winner {
            Some(winner) => debug!("{winner} wins after {} turn(s)", self.turns_played),
            None => debug!("No winner after {} turn(s): {}", self.turns_played, outcome.reason),
        }
    }

    fn record(&mut self, player: PlayerId, event: TurnEvent) {
        let record = TurnRecord::new(self.turns_played + 1, self.sequence, player, event);
        self.sequence += 1;
        self.history.push_back(record);
    }

    fn record_hand_sizes(&mut self) {
        if self.config.record_hand_sizes {
            let sizes = self.hand_sizes();
            self.hand_size_trace.push_back(sizes);
        }
    }
}

/// Flip the first discard, burying wild cards back in the pile.
fn flip_first_card(deck: &mut Deck, rng: &mut GameRng) -> Result<Card> {
    if deck.cards().iter().all(|card| card.is_wild()) {
        return Err(UnoError::InvalidConfiguration(
            "no colored card left to start the discard pile".to_string(),
        ));
    }

    loop {
        let card = deck
            .pop_top()
            .ok_or(UnoError::DeckExhausted { requested: 1, available: 0 })?;
        if !card.is_wild() {
            return Ok(card);
        }
        trace!("First card {card} is wild, burying it");
        deck.insert_random(card, rng);
    }
}
