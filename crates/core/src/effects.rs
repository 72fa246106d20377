use crate::RuleEffect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring events offered to every owned joker, in pipeline order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerEvent {
    OnCardScored,
    OnCardScoredEnd,
    OnCardHeld,
    Independent,
    OnHandScoredEnd,
}

impl JokerEvent {
    pub fn takes_card(self) -> bool {
        matches!(
            self,
            JokerEvent::OnCardScored | JokerEvent::OnCardScoredEnd | JokerEvent::OnCardHeld
        )
    }
}

pub const SHORT_MESSAGE_LEN: usize = 7;

/// Popup text of at most seven bytes, stored inline.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortMessage {
    bytes: [u8; SHORT_MESSAGE_LEN],
    len: u8,
}

impl ShortMessage {
    /// Truncates to the longest prefix that fits and ends on a char boundary.
    pub fn new(text: &str) -> Self {
        let mut end = text.len().min(SHORT_MESSAGE_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; SHORT_MESSAGE_LEN];
        bytes[..end].copy_from_slice(&text.as_bytes()[..end]);
        Self {
            bytes,
            len: end as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for ShortMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortMessage({:?})", self.as_str())
    }
}

impl fmt::Display for ShortMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one joker invocation. `xmult` is `None` when the joker has no
/// multiplicative part; `Some(0.0)` is treated the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JokerEffect {
    pub chips: i64,
    pub mult: f64,
    pub xmult: Option<f64>,
    pub money: i64,
    pub retrigger: bool,
    pub expire: bool,
    pub message: Option<ShortMessage>,
}

impl JokerEffect {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn chips(chips: i64) -> Self {
        Self {
            chips,
            ..Self::default()
        }
    }

    pub fn mult(mult: f64) -> Self {
        Self {
            mult,
            ..Self::default()
        }
    }

    pub fn xmult(factor: f64) -> Self {
        Self {
            xmult: Some(factor),
            ..Self::default()
        }
    }

    pub fn money(money: i64) -> Self {
        Self {
            money,
            ..Self::default()
        }
    }

    pub fn retrigger() -> Self {
        Self {
            retrigger: true,
            ..Self::default()
        }
    }

    pub fn with_message(mut self, text: &str) -> Self {
        self.message = Some(ShortMessage::new(text));
        self
    }

    pub fn effective_xmult(&self) -> Option<f64> {
        self.xmult.filter(|factor| *factor != 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.chips == 0
            && self.mult == 0.0
            && self.effective_xmult().is_none()
            && self.money == 0
            && !self.retrigger
            && !self.expire
            && self.message.is_none()
    }

    /// Score operations in merge order: chips, mult, then the factor.
    pub fn rule_effects(&self) -> impl Iterator<Item = RuleEffect> {
        let chips = (self.chips != 0).then_some(RuleEffect::AddChips(self.chips));
        let mult = (self.mult != 0.0).then_some(RuleEffect::AddMult(self.mult));
        let xmult = self.effective_xmult().map(RuleEffect::MultiplyMult);
        chips.into_iter().chain(mult).chain(xmult)
    }
}
