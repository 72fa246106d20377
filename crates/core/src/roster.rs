use crate::arena::{Arena, ArenaError, Handle};
use crate::list::{ListCursor, PoolList};
use crate::registry::{self, FOUR_FINGERS, SHORTCUT};
use crate::{Edition, HandEvalRules, Joker, JokerId};
use thiserror::Error;
use tracing::debug;

pub type JokerHandle = Handle<Joker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("all {capacity} joker slots are taken")]
    Full { capacity: usize },
    #[error("no registry entry for joker {0}")]
    UnknownJoker(JokerId),
    #[error("joker in slot {slot} is missing from the roster order")]
    Unlisted { slot: usize },
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

/// Owned jokers in acquisition order. Joker records live in an arena and
/// the order is kept by a pool-backed list of their handles.
#[derive(Debug, Clone)]
pub struct JokerRoster {
    jokers: Arena<Joker>,
    order: PoolList<JokerHandle>,
    slots: usize,
}

impl JokerRoster {
    pub fn new(slots: usize) -> Self {
        Self {
            jokers: Arena::with_capacity(slots),
            order: PoolList::with_capacity(slots),
            slots,
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.slots || self.jokers.is_full()
    }

    /// Creates a joker from its registry entry and appends it. Declines
    /// without side effects when every slot is taken.
    pub fn acquire(&mut self, id: JokerId, edition: Edition) -> Result<JokerHandle, RosterError> {
        let info = registry::entry_for(id).ok_or(RosterError::UnknownJoker(id))?;
        let mut joker = Joker {
            id,
            edition,
            value: info.base_price + edition.price_surcharge(),
            rarity: info.rarity,
            ..Joker::default()
        };
        if let Some(on_created) = info.on_created {
            on_created(&mut joker);
        }
        let handle = self.insert(joker)?;
        debug!(event = "joker_acquired", joker = info.name, slot = handle.index());
        Ok(handle)
    }

    pub fn insert(&mut self, joker: Joker) -> Result<JokerHandle, RosterError> {
        if self.len() >= self.slots {
            return Err(RosterError::Full {
                capacity: self.slots,
            });
        }
        let handle = self.jokers.acquire(joker)?;
        if let Err(err) = self.order.push_back(handle) {
            self.jokers.release(handle)?;
            return Err(err.into());
        }
        Ok(handle)
    }

    pub fn remove(&mut self, handle: JokerHandle) -> Result<Joker, RosterError> {
        self.jokers.resolve(handle)?;
        if self.order.remove_value(handle)?.is_none() {
            return Err(RosterError::Unlisted {
                slot: handle.index(),
            });
        }
        Ok(self.jokers.release(handle)?)
    }

    /// Removes the joker and returns what it sells for.
    pub fn sell(&mut self, handle: JokerHandle) -> Result<i64, RosterError> {
        let joker = self.remove(handle)?;
        let value = joker.sell_value();
        debug!(event = "joker_sold", joker = %joker.id, value);
        Ok(value)
    }

    pub fn get(&self, handle: JokerHandle) -> Result<&Joker, ArenaError> {
        self.jokers.resolve(handle)
    }

    pub fn get_mut(&mut self, handle: JokerHandle) -> Result<&mut Joker, ArenaError> {
        self.jokers.resolve_mut(handle)
    }

    pub fn handle_at(&self, n: usize) -> Option<JokerHandle> {
        self.order.get_at_index(n)
    }

    pub fn position_of(&self, handle: JokerHandle) -> Option<usize> {
        self.order.position_of(handle)
    }

    pub fn first(&self) -> Option<JokerHandle> {
        self.handle_at(0)
    }

    /// The joker after `handle` in acquisition order.
    pub fn next_after(&self, handle: JokerHandle) -> Option<JokerHandle> {
        let node = self.order.find_node(handle)?;
        let next = self.order.next_node(node)?;
        self.order.value(next).ok()
    }

    pub fn handles(&self) -> impl Iterator<Item = JokerHandle> + '_ {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JokerHandle, &Joker)> + '_ {
        self.order
            .iter()
            .filter_map(|handle| self.jokers.resolve(handle).ok().map(|joker| (handle, joker)))
    }

    pub fn count_of(&self, id: JokerId) -> usize {
        self.iter().filter(|(_, joker)| joker.id == id).count()
    }

    pub fn contains(&self, id: JokerId) -> bool {
        self.iter().any(|(_, joker)| joker.id == id)
    }

    pub fn eval_rules(&self) -> HandEvalRules {
        HandEvalRules {
            four_fingers: self.contains(FOUR_FINGERS),
            shortcut: self.contains(SHORTCUT),
        }
    }

    pub fn cursor(&self) -> ListCursor<JokerHandle> {
        self.order.cursor()
    }

    pub fn advance(&self, cursor: &mut ListCursor<JokerHandle>) -> Option<JokerHandle> {
        cursor.next(&self.order).map(|(_, handle)| handle)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.jokers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{JOKER, SELTZER};

    #[test]
    fn removal_keeps_the_rest_in_order() {
        let mut roster = JokerRoster::new(5);
        let first = roster.acquire(JOKER, Edition::Base).expect("slot");
        let second = roster.acquire(SELTZER, Edition::Base).expect("slot");
        let removed = roster.remove(first).expect("live joker");
        assert_eq!(removed.id, JOKER);
        assert_eq!(roster.first(), Some(second));
        assert_eq!(roster.len(), 1);
        assert_eq!(
            roster.remove(first),
            Err(RosterError::Arena(ArenaError::NotLive {
                index: first.index()
            }))
        );
    }

    #[test]
    fn unlisted_joker_is_reported_and_kept() {
        let mut roster = JokerRoster::new(5);
        let handle = roster.acquire(JOKER, Edition::Base).expect("slot");
        roster
            .order
            .remove_value(handle)
            .expect("list node")
            .expect("listed");
        assert_eq!(
            roster.remove(handle),
            Err(RosterError::Unlisted {
                slot: handle.index()
            })
        );
        assert!(roster.get(handle).is_ok());
    }
}
