//! Ordered list whose link nodes live in an [`Arena`].
//!
//! The list's length is bounded by the node arena's capacity. Nodes are
//! addressed by [`NodeHandle`]s, so a cursor can hold on to "the next node"
//! without borrowing the list, and the node it just yielded may be removed
//! before the cursor is advanced again.

use crate::arena::{Arena, ArenaError, Handle};

pub type NodeHandle<T> = Handle<ListNode<T>>;

#[derive(Debug, Clone)]
pub struct ListNode<T> {
    prev: Option<NodeHandle<T>>,
    next: Option<NodeHandle<T>>,
    value: Option<T>,
}

impl<T> Default for ListNode<T> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolList<T> {
    nodes: Arena<ListNode<T>>,
    head: Option<NodeHandle<T>>,
    tail: Option<NodeHandle<T>>,
    len: usize,
}

impl<T: Copy + PartialEq> PoolList<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.is_full()
    }

    pub fn push_front(&mut self, value: T) -> Result<NodeHandle<T>, ArenaError> {
        let node = self.nodes.acquire(ListNode {
            prev: None,
            next: self.head,
            value: Some(value),
        })?;
        match self.head {
            Some(old_head) => self.nodes.resolve_mut(old_head)?.prev = Some(node),
            None => self.tail = Some(node),
        }
        self.head = Some(node);
        self.len += 1;
        Ok(node)
    }

    pub fn push_back(&mut self, value: T) -> Result<NodeHandle<T>, ArenaError> {
        let node = self.nodes.acquire(ListNode {
            prev: self.tail,
            next: None,
            value: Some(value),
        })?;
        match self.tail {
            Some(old_tail) => self.nodes.resolve_mut(old_tail)?.next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(node)
    }

    /// Unlinks `node` and returns its value. The node arena is private to
    /// this list, so a live handle is always a member.
    pub fn remove_node(&mut self, node: NodeHandle<T>) -> Result<T, ArenaError> {
        let (prev, next) = {
            let entry = self.nodes.resolve(node)?;
            (entry.prev, entry.next)
        };
        match prev {
            Some(prev) => self.nodes.resolve_mut(prev)?.next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes.resolve_mut(next)?.prev = prev,
            None => self.tail = prev,
        }
        let removed = self.nodes.release(node)?;
        self.len -= 1;
        removed.value.ok_or(ArenaError::NotLive {
            index: node.index(),
        })
    }

    pub fn value(&self, node: NodeHandle<T>) -> Result<T, ArenaError> {
        let entry = self.nodes.resolve(node)?;
        entry.value.ok_or(ArenaError::NotLive {
            index: node.index(),
        })
    }

    pub fn next_node(&self, node: NodeHandle<T>) -> Option<NodeHandle<T>> {
        self.nodes.resolve(node).ok()?.next
    }

    pub fn head(&self) -> Option<NodeHandle<T>> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeHandle<T>> {
        self.tail
    }

    pub fn node_at_index(&self, n: usize) -> Option<NodeHandle<T>> {
        let mut cursor = self.cursor();
        let mut seen = 0;
        while let Some((node, _)) = cursor.next(self) {
            if seen == n {
                return Some(node);
            }
            seen += 1;
        }
        None
    }

    pub fn get_at_index(&self, n: usize) -> Option<T> {
        self.node_at_index(n).and_then(|node| self.value(node).ok())
    }

    /// `Ok(None)` when the list is shorter than `n + 1`.
    pub fn remove_at_index(&mut self, n: usize) -> Result<Option<T>, ArenaError> {
        match self.node_at_index(n) {
            Some(node) => self.remove_node(node).map(Some),
            None => Ok(None),
        }
    }

    pub fn position_of(&self, value: T) -> Option<usize> {
        self.iter().position(|item| item == value)
    }

    pub fn find_node(&self, value: T) -> Option<NodeHandle<T>> {
        let mut cursor = self.cursor();
        while let Some((node, item)) = cursor.next(self) {
            if item == value {
                return Some(node);
            }
        }
        None
    }

    pub fn remove_value(&mut self, value: T) -> Result<Option<T>, ArenaError> {
        match self.find_node(value) {
            Some(node) => self.remove_node(node).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn cursor(&self) -> ListCursor<T> {
        ListCursor { next: self.head }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.cursor(),
        }
    }
}

/// Forward cursor that does not borrow the list. The successor is captured
/// before a node is yielded, so removing the yielded node is safe; removing
/// any other node while a cursor is outstanding is not.
#[derive(Debug)]
pub struct ListCursor<T> {
    next: Option<NodeHandle<T>>,
}

impl<T> Clone for ListCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListCursor<T> {}

impl<T: Copy + PartialEq> ListCursor<T> {
    pub fn next(&mut self, list: &PoolList<T>) -> Option<(NodeHandle<T>, T)> {
        let node = self.next?;
        let Ok(entry) = list.nodes.resolve(node) else {
            self.next = None;
            return None;
        };
        self.next = entry.next;
        entry.value.map(|value| (node, value))
    }

    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }
}

pub struct Iter<'a, T> {
    list: &'a PoolList<T>,
    cursor: ListCursor<T>,
}

impl<'a, T: Copy + PartialEq> Iterator for Iter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.cursor.next(self.list).map(|(_, value)| value)
    }
}
