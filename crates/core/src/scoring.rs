//! The per-hand scoring state machine.
//!
//! A hand moves strictly forward through [`PlayPhase`]s. Each call to
//! [`ScoringPipeline::step`] performs one visible beat: a card adding its
//! chips, a joker producing an effect, or a phase change. Jokers whose
//! effect is empty are passed over inside the same beat.

use crate::arena::ArenaError;
use crate::list::ListCursor;
use crate::registry::{self, PAREIDOLIA};
use crate::{
    classify, locate_contributing_cards, Card, Counters, EventBus, GameConfig, GameContext,
    HandEvalRules, HandKind, JokerEffect, JokerEvent, JokerHandle, JokerId, Popup, PopupAnchor,
    RosterError, RuleEffect, Score, ScoreEvent, ScoreTraceStep, Table,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayPhase {
    PlayingAnimation,
    ScoringCards,
    ScoringHeld,
    ScoringIndependent,
    ScoringHandEnd,
    EndingAnimation,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("no cards were played")]
    NoCards,
    #[error("the hand has already been scored")]
    Terminal,
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandOutcome {
    pub kind: HandKind,
    pub chips: i64,
    pub mult: f64,
    /// `floor(chips * mult)`.
    pub score: i64,
    pub money_delta: i64,
    pub expired: Vec<JokerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardSet {
    Played,
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardStage {
    Present,
    Sweep(JokerEvent),
}

/// Position within a card phase.
#[derive(Debug, Clone, Copy)]
struct CardWalk {
    index: usize,
    stage: CardStage,
    retriggers: u32,
    retrigger_pending: bool,
}

impl Default for CardWalk {
    fn default() -> Self {
        Self {
            index: 0,
            stage: CardStage::Present,
            retriggers: 0,
            retrigger_pending: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    config: GameConfig,
    phase: PlayPhase,
    kind: HandKind,
    rules: HandEvalRules,
    all_cards_are_faces: bool,
    joker_slots: usize,
    contributing: Vec<bool>,
    score: Score,
    money_delta: i64,
    raised: usize,
    walk: CardWalk,
    joker_cursor: Option<ListCursor<JokerHandle>>,
    pending_expiry: Vec<JokerHandle>,
    expired: Vec<JokerId>,
    trace: Vec<ScoreTraceStep>,
    events: EventBus,
}

impl ScoringPipeline {
    /// Commits the table's played cards as a hand: spends one hand,
    /// classifies, and loads the category's base chips and mult.
    pub fn begin(config: &GameConfig, table: &mut Table) -> Result<Self, PipelineError> {
        if table.played.is_empty() {
            warn!(event = "pipeline_misuse", "hand committed with no cards");
            return Err(PipelineError::NoCards);
        }
        table.counters.hands_remaining = table.counters.hands_remaining.saturating_sub(1);

        let rules = table.roster.eval_rules();
        let kind = classify(&table.played, rules);
        let contributing = locate_contributing_cards(kind, &table.played, rules);
        let (chips, mult) = config.hand_base(kind);
        debug!(
            event = "hand_classified",
            kind = kind.id(),
            chips,
            mult,
            played = table.played.len(),
            jokers = table.roster.len(),
        );

        let mut events = EventBus::default();
        events.push(ScoreEvent::HandClassified {
            kind,
            chips,
            mult,
            contributing: contributing.clone(),
        });

        Ok(Self {
            config: config.clone(),
            phase: PlayPhase::PlayingAnimation,
            kind,
            rules,
            all_cards_are_faces: table.roster.contains(PAREIDOLIA),
            joker_slots: table.roster.slots(),
            contributing,
            score: Score::new(chips, mult),
            money_delta: 0,
            raised: 0,
            walk: CardWalk::default(),
            joker_cursor: None,
            pending_expiry: Vec::new(),
            expired: Vec::new(),
            trace: Vec::new(),
            events,
        })
    }

    /// Starts over with whatever the table now has in play. Cursors and
    /// totals from the previous hand are discarded.
    pub fn reset(&mut self, table: &mut Table) -> Result<(), PipelineError> {
        *self = Self::begin(&self.config, table)?;
        Ok(())
    }

    pub fn phase(&self) -> PlayPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PlayPhase::Ended
    }

    pub fn kind(&self) -> HandKind {
        self.kind
    }

    pub fn rules(&self) -> HandEvalRules {
        self.rules
    }

    pub fn contributing(&self) -> &[bool] {
        &self.contributing
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn money_delta(&self) -> i64 {
        self.money_delta
    }

    pub fn trace(&self) -> &[ScoreTraceStep] {
        &self.trace
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ScoreEvent> + '_ {
        self.events.drain()
    }

    pub fn outcome(&self) -> HandOutcome {
        HandOutcome {
            kind: self.kind,
            chips: self.score.chips,
            mult: self.score.mult,
            score: self.score.total(),
            money_delta: self.money_delta,
            expired: self.expired.clone(),
        }
    }

    /// Performs one beat and returns the phase afterwards.
    pub fn step(&mut self, table: &mut Table) -> Result<PlayPhase, PipelineError> {
        match self.phase {
            PlayPhase::Ended => {
                warn!(event = "pipeline_misuse", "step after the hand ended");
                return Err(PipelineError::Terminal);
            }
            PlayPhase::PlayingAnimation => {
                self.raised += 1;
                if self.raised >= table.played.len() {
                    self.enter(PlayPhase::ScoringCards, table);
                }
            }
            PlayPhase::ScoringCards => self.step_cards(table, CardSet::Played)?,
            PlayPhase::ScoringHeld => self.step_cards(table, CardSet::Held)?,
            PlayPhase::ScoringIndependent => {
                self.step_hand(table, JokerEvent::Independent, PlayPhase::ScoringHandEnd)?
            }
            PlayPhase::ScoringHandEnd => {
                self.step_hand(table, JokerEvent::OnHandScoredEnd, PlayPhase::EndingAnimation)?
            }
            PlayPhase::EndingAnimation => {
                self.raised = self.raised.saturating_sub(1);
                if self.raised == 0 {
                    self.finish(table);
                }
            }
        }
        Ok(self.phase)
    }

    /// Steps until the phase changes, without any pacing.
    pub fn run_phase(&mut self, table: &mut Table) -> Result<PlayPhase, PipelineError> {
        let start = self.phase;
        loop {
            let phase = self.step(table)?;
            if phase != start {
                return Ok(phase);
            }
        }
    }

    pub fn resolve_all(&mut self, table: &mut Table) -> Result<HandOutcome, PipelineError> {
        if self.is_finished() {
            warn!(event = "pipeline_misuse", "resolve after the hand ended");
            return Err(PipelineError::Terminal);
        }
        while !self.is_finished() {
            self.run_phase(table)?;
        }
        Ok(self.outcome())
    }

    fn enter(&mut self, phase: PlayPhase, table: &Table) {
        let from = self.phase;
        self.phase = phase;
        self.walk = CardWalk::default();
        self.joker_cursor = match phase {
            PlayPhase::ScoringIndependent | PlayPhase::ScoringHandEnd => {
                Some(table.roster.cursor())
            }
            _ => None,
        };
        debug!(event = "phase_change", from = ?from, to = ?phase);
        self.events.push(ScoreEvent::PhaseChanged { from, to: phase });
    }

    fn step_cards(&mut self, table: &mut Table, set: CardSet) -> Result<(), PipelineError> {
        loop {
            match self.walk.stage {
                CardStage::Present => {
                    let next = match set {
                        CardSet::Played => (self.walk.index..table.played.len())
                            .find(|&idx| self.contributing.get(idx).copied().unwrap_or(false)),
                        CardSet::Held => {
                            (self.walk.index < table.hand.len()).then_some(self.walk.index)
                        }
                    };
                    let Some(index) = next else {
                        let phase = match set {
                            CardSet::Played => PlayPhase::ScoringHeld,
                            CardSet::Held => PlayPhase::ScoringIndependent,
                        };
                        self.enter(phase, table);
                        return Ok(());
                    };
                    self.walk.index = index;
                    self.joker_cursor = Some(table.roster.cursor());
                    match set {
                        CardSet::Played => {
                            self.walk.stage = CardStage::Sweep(JokerEvent::OnCardScored);
                            let card = table.played[index];
                            let chips = card.value() as i64;
                            trace!(event = "card_scored", index, card = %card, chips);
                            self.events.push(ScoreEvent::CardScored { index, card, chips });
                            self.apply_rule(
                                format!("card {card}"),
                                PopupAnchor::PlayedCard(index),
                                RuleEffect::AddChips(chips),
                            );
                            return Ok(());
                        }
                        CardSet::Held => {
                            self.walk.stage = CardStage::Sweep(JokerEvent::OnCardHeld);
                        }
                    }
                }
                CardStage::Sweep(event) => {
                    let index = self.walk.index;
                    let card = match set {
                        CardSet::Played => table.played[index],
                        CardSet::Held => table.hand[index],
                    };
                    if self.offer_next(table, event, Some(card), index as i32)? {
                        return Ok(());
                    }
                    self.flush_expired(table)?;

                    if event == JokerEvent::OnCardScored {
                        self.walk.stage = CardStage::Sweep(JokerEvent::OnCardScoredEnd);
                        self.joker_cursor = Some(table.roster.cursor());
                        continue;
                    }

                    if self.walk.retrigger_pending {
                        self.walk.retrigger_pending = false;
                        let cap = self.config.scoring.max_retriggers_per_card;
                        if self.walk.retriggers < cap {
                            self.walk.retriggers += 1;
                            let anchor = match set {
                                CardSet::Played => PopupAnchor::PlayedCard(index),
                                CardSet::Held => PopupAnchor::HeldCard(index),
                            };
                            trace!(event = "retrigger", index, count = self.walk.retriggers);
                            self.events.push(ScoreEvent::Retrigger { anchor });
                            self.events.push(ScoreEvent::Popup {
                                anchor,
                                popup: Popup::message("Again!"),
                            });
                            self.walk.stage = CardStage::Present;
                            continue;
                        }
                        warn!(event = "retrigger_cap", index, cap, "retrigger request dropped");
                    }

                    self.walk.retriggers = 0;
                    self.walk.index += 1;
                    self.walk.stage = CardStage::Present;
                }
            }
        }
    }

    fn step_hand(
        &mut self,
        table: &mut Table,
        event: JokerEvent,
        next: PlayPhase,
    ) -> Result<(), PipelineError> {
        if self.offer_next(table, event, None, -1)? {
            return Ok(());
        }
        self.flush_expired(table)?;
        self.enter(next, table);
        Ok(())
    }

    /// Offers `event` to the remaining jokers of the current sweep and
    /// merges the first non-empty effect. Returns false once the sweep is
    /// exhausted.
    fn offer_next(
        &mut self,
        table: &mut Table,
        event: JokerEvent,
        card: Option<Card>,
        scored_index: i32,
    ) -> Result<bool, PipelineError> {
        loop {
            let Some(cursor) = self.joker_cursor.as_mut() else {
                return Ok(false);
            };
            let Some(handle) = table.roster.advance(cursor) else {
                self.joker_cursor = None;
                return Ok(false);
            };
            let ctx = self.context(&table.played, &table.hand, table.counters, scored_index);
            let effect = registry::resolve_effect(
                &mut table.roster,
                handle,
                card,
                event,
                &ctx,
                &mut table.rng,
            )?;
            if effect.is_empty() {
                continue;
            }
            let id = table.roster.get(handle)?.id;
            self.merge(handle, id, event, &effect);
            return Ok(true);
        }
    }

    fn context<'t>(
        &self,
        played: &'t [Card],
        hand: &'t [Card],
        counters: Counters,
        scored_index: i32,
    ) -> GameContext<'t> {
        GameContext {
            played,
            hand,
            kind: self.kind,
            scored_index,
            counters: Counters {
                money: counters.money + self.money_delta,
                ..counters
            },
            rules: self.rules,
            joker_slots: self.joker_slots,
            all_cards_are_faces: self.all_cards_are_faces,
        }
    }

    fn merge(&mut self, handle: JokerHandle, id: JokerId, event: JokerEvent, effect: &JokerEffect) {
        let name = registry::entry_for(id).map_or("joker", |info| info.name);
        let anchor = PopupAnchor::Joker(id);
        trace!(event = "joker_effect", joker = name, trigger = ?event, effect = ?effect);

        for rule in effect.rule_effects() {
            self.apply_rule(name.to_string(), anchor, rule);
        }
        if effect.money != 0 {
            self.money_delta += effect.money;
            self.events.push(ScoreEvent::Popup {
                anchor,
                popup: Popup::money(effect.money),
            });
        }
        if let Some(message) = effect.message {
            self.events.push(ScoreEvent::Popup {
                anchor,
                popup: Popup::message(message.as_str()),
            });
        }
        if effect.retrigger && event.takes_card() {
            self.walk.retrigger_pending = true;
        }
        if effect.expire && !self.pending_expiry.contains(&handle) {
            self.pending_expiry.push(handle);
        }
    }

    fn apply_rule(&mut self, source: String, anchor: PopupAnchor, rule: RuleEffect) {
        let before = self.score;
        self.score.apply(&rule);
        let popup = match rule {
            RuleEffect::AddChips(chips) => Popup::chips(chips),
            RuleEffect::AddMult(mult) => Popup::mult(mult),
            RuleEffect::MultiplyMult(factor) => Popup::xmult(factor),
        };
        self.trace.push(ScoreTraceStep {
            source,
            effect: rule,
            before,
            after: self.score,
        });
        self.events.push(ScoreEvent::Popup { anchor, popup });
    }

    /// Expiry waits for the sweep that requested it to finish.
    fn flush_expired(&mut self, table: &mut Table) -> Result<(), PipelineError> {
        for handle in std::mem::take(&mut self.pending_expiry) {
            let joker = table.roster.remove(handle)?;
            debug!(event = "joker_expired", joker = %joker.id);
            self.expired.push(joker.id);
            self.events.push(ScoreEvent::JokerExpired { id: joker.id });
        }
        Ok(())
    }

    fn finish(&mut self, table: &mut Table) {
        table.counters.money += self.money_delta;
        let outcome = self.outcome();
        debug!(
            event = "hand_scored",
            kind = outcome.kind.id(),
            chips = outcome.chips,
            mult = outcome.mult,
            score = outcome.score,
            money_delta = outcome.money_delta,
        );
        self.events.push(ScoreEvent::HandScored {
            kind: outcome.kind,
            chips: outcome.chips,
            mult: outcome.mult,
            total: outcome.score,
            money_delta: outcome.money_delta,
        });
        self.enter(PlayPhase::Ended, table);
    }
}

/// Scores the table's played cards in one go.
pub fn score_hand(config: &GameConfig, table: &mut Table) -> Result<HandOutcome, PipelineError> {
    let mut pipeline = ScoringPipeline::begin(config, table)?;
    pipeline.resolve_all(table)
}
