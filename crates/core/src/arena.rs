//! Fixed-capacity object arenas addressed by typed index handles.
//!
//! Occupancy lives in a small bitmap of 32-bit words. Allocation scans the
//! complement of each word, so fully occupied words cost one comparison and
//! the first free slot falls out of a trailing-zeros count.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use thiserror::Error;

pub const BITS_PER_WORD: usize = 32;
pub const BITMAP_WORDS: usize = 8;
pub const MAX_ARENA_CAPACITY: usize = BITS_PER_WORD * BITMAP_WORDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena exhausted (capacity {capacity})")]
    Exhausted { capacity: usize },
    #[error("handle {index} out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },
    #[error("handle {index} is not live")]
    NotLive { index: usize },
}

/// Index into an [`Arena<T>`]. The type parameter keeps handles from one
/// arena from being resolved against another.
pub struct Handle<T> {
    index: u16,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub const fn from_index(index: u16) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Occupancy bitmap. Bits at or past the logical capacity are set at
/// construction and never cleared, so they can never be handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    words: [u32; BITMAP_WORDS],
    capacity: usize,
}

impl Bitmap {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_ARENA_CAPACITY);
        let mut words = [0u32; BITMAP_WORDS];
        for bit in capacity..MAX_ARENA_CAPACITY {
            words[bit / BITS_PER_WORD] |= 1 << (bit % BITS_PER_WORD);
        }
        Self { words, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets and returns the lowest clear bit.
    pub fn claim_lowest(&mut self) -> Option<usize> {
        for (word_idx, word) in self.words.iter_mut().enumerate() {
            let free = !*word;
            if free == 0 {
                continue;
            }
            let bit = free.trailing_zeros() as usize;
            *word |= 1 << bit;
            return Some(word_idx * BITS_PER_WORD + bit);
        }
        None
    }

    pub fn get(&self, idx: usize) -> bool {
        if idx >= self.capacity {
            return false;
        }
        self.words[idx / BITS_PER_WORD] & (1 << (idx % BITS_PER_WORD)) != 0
    }

    pub fn set(&mut self, idx: usize, on: bool) {
        if idx >= self.capacity {
            return;
        }
        let mask = 1u32 << (idx % BITS_PER_WORD);
        if on {
            self.words[idx / BITS_PER_WORD] |= mask;
        } else {
            self.words[idx / BITS_PER_WORD] &= !mask;
        }
    }

    pub fn count(&self) -> usize {
        let total: usize = self.words.iter().map(|w| w.count_ones() as usize).sum();
        total - (MAX_ARENA_CAPACITY - self.capacity)
    }

    /// Index of the `n`th set bit (zero based) below the logical capacity.
    pub fn nth_set(&self, n: usize) -> Option<usize> {
        let mut seen = 0;
        for (word_idx, word) in self.words.iter().enumerate() {
            let base = word_idx * BITS_PER_WORD;
            if base >= self.capacity {
                break;
            }
            let valid = (self.capacity - base).min(BITS_PER_WORD);
            let masked = if valid == BITS_PER_WORD {
                *word
            } else {
                *word & ((1u32 << valid) - 1)
            };
            let ones = masked.count_ones() as usize;
            if seen + ones <= n {
                seen += ones;
                continue;
            }
            let mut rest = masked;
            for _ in 0..(n - seen) {
                rest &= rest - 1;
            }
            return Some(base + rest.trailing_zeros() as usize);
        }
        None
    }

    pub fn clear(&mut self) {
        *self = Self::with_capacity(self.capacity);
    }
}

/// Fixed-capacity storage. The slot array is allocated once at construction
/// and never grows; the bitmap alone decides whether a slot is live.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Box<[T]>,
    live: Bitmap,
}

impl<T: Default> Arena<T> {
    /// Capacities above [`MAX_ARENA_CAPACITY`] are clamped.
    pub fn with_capacity(capacity: usize) -> Self {
        let live = Bitmap::with_capacity(capacity);
        let slots = (0..live.capacity()).map(|_| T::default()).collect();
        Self { slots, live }
    }

    pub fn acquire(&mut self, value: T) -> Result<Handle<T>, ArenaError> {
        let index = self.live.claim_lowest().ok_or(ArenaError::Exhausted {
            capacity: self.capacity(),
        })?;
        self.slots[index] = value;
        Ok(Handle::from_index(index as u16))
    }

    /// Frees the slot and hands back what it held. Releasing a free or
    /// foreign handle is rejected and leaves the arena untouched.
    pub fn release(&mut self, handle: Handle<T>) -> Result<T, ArenaError> {
        let index = self.check(handle)?;
        self.live.set(index, false);
        Ok(std::mem::take(&mut self.slots[index]))
    }

    pub fn clear(&mut self) {
        for index in 0..self.capacity() {
            if self.live.get(index) {
                self.slots[index] = T::default();
            }
        }
        self.live.clear();
    }
}

impl<T> Arena<T> {
    pub fn resolve(&self, handle: Handle<T>) -> Result<&T, ArenaError> {
        let index = self.check(handle)?;
        Ok(&self.slots[index])
    }

    pub fn resolve_mut(&mut self, handle: Handle<T>) -> Result<&mut T, ArenaError> {
        let index = self.check(handle)?;
        Ok(&mut self.slots[index])
    }

    pub fn is_live(&self, handle: Handle<T>) -> bool {
        self.check(handle).is_ok()
    }

    pub fn capacity(&self) -> usize {
        self.live.capacity()
    }

    pub fn len(&self) -> usize {
        self.live.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Live handles in index order.
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        let mut n = 0;
        std::iter::from_fn(move || {
            let index = self.live.nth_set(n)?;
            n += 1;
            Some(Handle::from_index(index as u16))
        })
    }

    fn check(&self, handle: Handle<T>) -> Result<usize, ArenaError> {
        let index = handle.index();
        if index >= self.capacity() {
            return Err(ArenaError::OutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        if !self.live.get(index) {
            return Err(ArenaError::NotLive { index });
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_bits_are_never_claimed() {
        let mut bitmap = Bitmap::with_capacity(33);
        let claimed: Vec<usize> = std::iter::from_fn(|| bitmap.claim_lowest()).collect();
        assert_eq!(claimed, (0..33).collect::<Vec<_>>());
        assert_eq!(bitmap.count(), 33);
    }

    #[test]
    fn nth_set_walks_across_words() {
        let mut bitmap = Bitmap::with_capacity(64);
        for idx in [1, 5, 31, 32, 40] {
            bitmap.set(idx, true);
        }
        assert_eq!(bitmap.nth_set(0), Some(1));
        assert_eq!(bitmap.nth_set(2), Some(31));
        assert_eq!(bitmap.nth_set(3), Some(32));
        assert_eq!(bitmap.nth_set(4), Some(40));
        assert_eq!(bitmap.nth_set(5), None);
    }

    #[test]
    fn nth_set_ignores_padding() {
        let mut bitmap = Bitmap::with_capacity(3);
        bitmap.set(2, true);
        assert_eq!(bitmap.nth_set(0), Some(2));
        assert_eq!(bitmap.nth_set(1), None);
    }

    #[test]
    fn clear_keeps_padding() {
        let mut bitmap = Bitmap::with_capacity(2);
        bitmap.claim_lowest();
        bitmap.clear();
        assert_eq!(bitmap.count(), 0);
        assert_eq!(bitmap.claim_lowest(), Some(0));
        assert_eq!(bitmap.claim_lowest(), Some(1));
        assert_eq!(bitmap.claim_lowest(), None);
    }
}
