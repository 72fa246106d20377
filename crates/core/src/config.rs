use crate::HandKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandRule {
    pub kind: HandKind,
    pub display_name: String,
    pub base_chips: i64,
    pub base_mult: f64,
}

/// Frame counts for the paced pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacingRule {
    #[serde(default = "default_start_delay")]
    pub start_delay: u32,
    #[serde(default = "default_playing_interval")]
    pub playing_interval: u32,
    #[serde(default = "default_scoring_interval")]
    pub scoring_interval: u32,
    #[serde(default = "default_ending_interval")]
    pub ending_interval: u32,
}

impl Default for PacingRule {
    fn default() -> Self {
        Self {
            start_delay: default_start_delay(),
            playing_interval: default_playing_interval(),
            scoring_interval: default_scoring_interval(),
            ending_interval: default_ending_interval(),
        }
    }
}

fn default_start_delay() -> u32 {
    40
}

fn default_playing_interval() -> u32 {
    10
}

fn default_scoring_interval() -> u32 {
    30
}

fn default_ending_interval() -> u32 {
    10
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRule {
    #[serde(default = "default_joker_slots")]
    pub joker_slots: usize,
    /// Safety cap on re-presentations of a single card.
    #[serde(default = "default_max_retriggers")]
    pub max_retriggers_per_card: u32,
    #[serde(default)]
    pub pacing: PacingRule,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            joker_slots: default_joker_slots(),
            max_retriggers_per_card: default_max_retriggers(),
            pacing: PacingRule::default(),
        }
    }
}

fn default_joker_slots() -> usize {
    5
}

fn default_max_retriggers() -> u32 {
    32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub hands: Vec<HandRule>,
    #[serde(default)]
    pub scoring: ScoringRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hands: HandKind::ALL
                .into_iter()
                .map(|kind| {
                    let (base_chips, base_mult) = kind.default_base();
                    HandRule {
                        kind,
                        display_name: default_display_name(kind).to_string(),
                        base_chips,
                        base_mult,
                    }
                })
                .collect(),
            scoring: ScoringRule::default(),
        }
    }
}

impl GameConfig {
    pub fn hand_rule(&self, kind: HandKind) -> Option<&HandRule> {
        self.hands.iter().find(|rule| rule.kind == kind)
    }

    /// Base chips and mult for `kind`, falling back to the built-in table.
    pub fn hand_base(&self, kind: HandKind) -> (i64, f64) {
        self.hand_rule(kind)
            .map(|rule| (rule.base_chips, rule.base_mult))
            .unwrap_or_else(|| kind.default_base())
    }

    pub fn display_name(&self, kind: HandKind) -> &str {
        self.hand_rule(kind)
            .map(|rule| rule.display_name.as_str())
            .unwrap_or_else(|| default_display_name(kind))
    }
}

fn default_display_name(kind: HandKind) -> &'static str {
    match kind {
        HandKind::None => "",
        HandKind::HighCard => "HIGH C",
        HandKind::Pair => "PAIR",
        HandKind::TwoPair => "2 PAIR",
        HandKind::Trips => "3 OAK",
        HandKind::Straight => "STRAIT",
        HandKind::Flush => "FLUSH",
        HandKind::FullHouse => "FULL H",
        HandKind::Quads => "4 OAK",
        HandKind::StraightFlush => "STR F",
        HandKind::RoyalFlush => "ROYAL F",
        HandKind::FiveOfAKind => "5 OAK",
        HandKind::FlushHouse => "FLUSH H",
        HandKind::FlushFive => "FLUSH 5",
    }
}
