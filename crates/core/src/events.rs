use crate::{Card, HandKind, JokerId, PlayPhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TextColor {
    Blue,
    Red,
    Yellow,
    White,
}

/// A piece of text for the presentation layer to place next to the card
/// or joker that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Popup {
    pub text: String,
    pub color: TextColor,
}

impl Popup {
    pub fn chips(chips: i64) -> Self {
        Self {
            text: format!("+{chips}"),
            color: TextColor::Blue,
        }
    }

    pub fn mult(mult: f64) -> Self {
        Self {
            text: format!("+{}", format_number(mult)),
            color: TextColor::Red,
        }
    }

    pub fn xmult(factor: f64) -> Self {
        Self {
            text: format!("X{}", format_number(factor)),
            color: TextColor::Red,
        }
    }

    pub fn money(money: i64) -> Self {
        let text = if money < 0 {
            format!("-${}", -money)
        } else {
            format!("+${money}")
        };
        Self {
            text,
            color: TextColor::Yellow,
        }
    }

    pub fn message(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: TextColor::White,
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Where a popup is anchored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PopupAnchor {
    PlayedCard(usize),
    HeldCard(usize),
    Joker(JokerId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ScoreEvent {
    HandClassified {
        kind: HandKind,
        chips: i64,
        mult: f64,
        contributing: Vec<bool>,
    },
    PhaseChanged {
        from: PlayPhase,
        to: PlayPhase,
    },
    CardScored {
        index: usize,
        card: Card,
        chips: i64,
    },
    Popup {
        anchor: PopupAnchor,
        popup: Popup,
    },
    Retrigger {
        anchor: PopupAnchor,
    },
    JokerExpired {
        id: JokerId,
    },
    HandScored {
        kind: HandKind,
        chips: i64,
        mult: f64,
        total: i64,
        money_delta: i64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    queue: Vec<ScoreEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: ScoreEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ScoreEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
