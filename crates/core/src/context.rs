use crate::{Card, Distribution, HandEvalRules, HandKind, JokerRoster, RngState, ScoringRule};

/// Resource counters that effects read. Money is also written, through
/// the pipeline's money delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub hands_remaining: u32,
    pub discards_remaining: u32,
    pub money: i64,
    pub deck_remaining: usize,
}

/// Everything a hand is scored against: the owned jokers, the played and
/// held cards, the counters, and the random source.
#[derive(Debug, Clone)]
pub struct Table {
    pub roster: JokerRoster,
    pub played: Vec<Card>,
    pub hand: Vec<Card>,
    pub counters: Counters,
    pub rng: RngState,
}

impl Table {
    pub fn new(rule: &ScoringRule, seed: u64) -> Self {
        Self {
            roster: JokerRoster::new(rule.joker_slots),
            played: Vec::new(),
            hand: Vec::new(),
            counters: Counters::default(),
            rng: RngState::from_seed(seed),
        }
    }

    pub fn play(&mut self, played: Vec<Card>, held: Vec<Card>) {
        self.played = played;
        self.hand = held;
    }
}

/// Read-only view handed to every effect call.
#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    pub played: &'a [Card],
    pub hand: &'a [Card],
    pub kind: HandKind,
    /// Position of the card being presented within its phase: the played
    /// sequence while scoring cards, the held cards while scoring held cards.
    pub scored_index: i32,
    pub counters: Counters,
    pub rules: HandEvalRules,
    pub joker_slots: usize,
    pub all_cards_are_faces: bool,
}

impl<'a> GameContext<'a> {
    pub fn new(played: &'a [Card], hand: &'a [Card], counters: Counters) -> Self {
        Self {
            played,
            hand,
            kind: HandKind::None,
            scored_index: -1,
            counters,
            rules: HandEvalRules::default(),
            joker_slots: 0,
            all_cards_are_faces: false,
        }
    }

    pub fn played_distribution(&self) -> Distribution {
        Distribution::from_cards(self.played)
    }

    pub fn is_face(&self, card: &Card) -> bool {
        self.all_cards_are_faces || card.is_face()
    }

    pub fn played_contains_straight(&self) -> bool {
        self.played_distribution().has_straight(self.rules)
    }

    pub fn played_contains_flush(&self) -> bool {
        self.played_distribution().has_flush(self.rules)
    }
}
