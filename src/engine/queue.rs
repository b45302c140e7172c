//! FIFO of clicked cards waiting to be paired.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::core::{CardId, CardPair};

/// Click-ordered queue with O(1) membership checks.
///
/// `members` always mirrors `order`; a card appears at most once.
#[derive(Clone, Debug, Default)]
pub struct ClickQueue {
    order: VecDeque<CardId>,
    members: FxHashSet<CardId>,
}

impl ClickQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card. Returns `false` if it is already queued.
    pub fn push(&mut self, card: CardId) -> bool {
        if !self.members.insert(card) {
            return false;
        }
        self.order.push_back(card);
        true
    }

    /// Take the two oldest cards, or nothing if fewer than two are queued.
    pub fn pop_pair(&mut self) -> Option<CardPair> {
        if self.order.len() < 2 {
            return None;
        }
        let first = self.order.pop_front()?;
        let second = self.order.pop_front()?;
        self.members.remove(&first);
        self.members.remove(&second);
        Some(CardPair::new(first, second))
    }

    /// Drop a card wherever it sits. Returns `false` if it was not queued.
    pub fn remove(&mut self, card: CardId) -> bool {
        if !self.members.remove(&card) {
            return false;
        }
        self.order.retain(|&queued| queued != card);
        true
    }

    /// Check if a card is waiting.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.members.contains(&card)
    }

    /// Number of waiting cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Waiting cards, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.order.iter().copied()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_duplicates() {
        let mut queue = ClickQueue::new();
        assert!(queue.push(CardId(1)));
        assert!(!queue.push(CardId(1)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pop_pair_is_fifo() {
        let mut queue = ClickQueue::new();
        for id in [3, 1, 2, 0] {
            queue.push(CardId(id));
        }

        assert_eq!(queue.pop_pair(), Some(CardPair::new(CardId(3), CardId(1))));
        assert_eq!(queue.pop_pair(), Some(CardPair::new(CardId(2), CardId(0))));
        assert_eq!(queue.pop_pair(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_pair_needs_two() {
        let mut queue = ClickQueue::new();
        queue.push(CardId(7));

        assert_eq!(queue.pop_pair(), None);
        assert!(queue.contains(CardId(7)));
    }

    #[test]
    fn test_popped_cards_can_requeue() {
        let mut queue = ClickQueue::new();
        queue.push(CardId(0));
        queue.push(CardId(1));
        queue.pop_pair();

        assert!(!queue.contains(CardId(0)));
        assert!(queue.push(CardId(0)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut queue = ClickQueue::new();
        for id in 0..4 {
            queue.push(CardId(id));
        }

        assert!(queue.remove(CardId(1)));
        assert!(!queue.remove(CardId(1)));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![CardId(0), CardId(2), CardId(3)]);
    }
}
