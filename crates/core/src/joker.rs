use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable registry identity. Identities are never renumbered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JokerId(pub u8);

impl fmt::Display for JokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl JokerRarity {
    /// Percent chance of each rarity when a joker is rolled.
    pub fn chance(self) -> u32 {
        match self {
            JokerRarity::Common => 70,
            JokerRarity::Uncommon => 25,
            JokerRarity::Rare => 5,
            JokerRarity::Legendary => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edition {
    #[default]
    Base,
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

impl Edition {
    pub fn price_surcharge(self) -> i64 {
        match self {
            Edition::Base => 0,
            Edition::Foil => 2,
            Edition::Holographic => 3,
            Edition::Polychrome | Edition::Negative => 5,
        }
    }
}

/// Per-instance counters. Which shape a joker uses is fixed by its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scratch {
    Single(i32),
    Paired { first: i16, second: i16 },
}

impl Default for Scratch {
    fn default() -> Self {
        Scratch::Single(0)
    }
}

impl Scratch {
    pub fn single(&self) -> i32 {
        match *self {
            Scratch::Single(value) => value,
            Scratch::Paired { first, .. } => first as i32,
        }
    }

    pub fn set_single(&mut self, value: i32) {
        *self = Scratch::Single(value);
    }

    pub fn pair(&self) -> (i16, i16) {
        match *self {
            Scratch::Paired { first, second } => (first, second),
            Scratch::Single(value) => (value as i16, 0),
        }
    }

    pub fn set_pair(&mut self, first: i16, second: i16) {
        *self = Scratch::Paired { first, second };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joker {
    pub id: JokerId,
    pub edition: Edition,
    pub value: i64,
    pub rarity: JokerRarity,
    pub scratch: Scratch,
}

impl Default for Joker {
    fn default() -> Self {
        Self {
            id: JokerId(0),
            edition: Edition::Base,
            value: 0,
            rarity: JokerRarity::Common,
            scratch: Scratch::default(),
        }
    }
}

impl Joker {
    pub fn sell_value(&self) -> i64 {
        self.value / 2
    }
}
