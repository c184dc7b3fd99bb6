//! Fixed-capacity ring buffer with O(1) push at either end
//!
//! Capacity is always a power of two so that wrapping an index is a single
//! mask instead of a modulo. `head` and `tail` are free-running counters;
//! only their difference and their masked values are meaningful.
//!
//! Overflow is not an error: pushing at the tail past capacity evicts the
//! oldest element, pushing at the head evicts the newest. The buffer is a
//! bounded sliding window over recent history.
//!
//! Only logical indices in `[0, len)` are reachable through the public API.
//! Physical slot access stays private.

use std::fmt;
use std::ops::Index;

use crate::{KinesyncError, KinesyncResult};

const MAX_POWER_OF_TWO: usize = 1 << (usize::BITS - 1);

pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    mask: usize,
    head: usize,
    tail: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer holding at least `capacity` elements
    ///
    /// The real capacity is the smallest power of two >= `capacity`
    /// (a request of 0 gives capacity 1). Requests past the largest
    /// power of two are clamped to it.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .unwrap_or(MAX_POWER_OF_TWO);
        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>();
        RingBuffer {
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    fn slot(&self, logical: usize) -> usize {
        self.head.wrapping_add(logical) & self.mask
    }

    /// Append at the tail, evicting the oldest element when full
    pub fn enqueue(&mut self, item: T) {
        let idx = self.tail & self.mask;
        self.slots[idx] = Some(item);
        self.tail = self.tail.wrapping_add(1);
        if self.len() > self.capacity() {
            self.head = self.head.wrapping_add(1);
        }
    }

    /// Prepend at the head, evicting the newest element when full
    pub fn push(&mut self, item: T) {
        self.head = self.head.wrapping_sub(1);
        let idx = self.head & self.mask;
        self.slots[idx] = Some(item);
        if self.len() > self.capacity() {
            self.tail = self.tail.wrapping_sub(1);
        }
    }

    /// Insert `item` so that `offset_from_end` elements follow it
    ///
    /// An offset of 0 appends, an offset of `len()` prepends. Elements after
    /// the insertion point are shifted one slot toward the tail, so the cost
    /// is proportional to `offset_from_end`. When the buffer is full the
    /// oldest element is evicted, exactly as with [`enqueue`](Self::enqueue);
    /// if that oldest position is where `item` would land, `item` itself is
    /// the evicted element and the buffer is left unchanged.
    pub fn insert_at_offset_from_tail(
        &mut self,
        offset_from_end: usize,
        item: T,
    ) -> KinesyncResult<()> {
        let len = self.len();
        if offset_from_end > len {
            return Err(KinesyncError::IndexOutOfRange {
                index: offset_from_end,
                len,
            });
        }
        let mut index = len - offset_from_end;

        if self.is_full() {
            if index == 0 {
                return Ok(());
            }
            self.slots[self.head & self.mask] = None;
            self.head = self.head.wrapping_add(1);
            index -= 1;
        }

        // Shift [index, len) one slot toward the tail
        for logical in (index..self.len()).rev() {
            let from = self.slot(logical);
            let to = self.slot(logical + 1);
            self.slots[to] = self.slots[from].take();
        }

        let at = self.slot(index);
        self.slots[at] = Some(item);
        self.tail = self.tail.wrapping_add(1);
        Ok(())
    }

    /// Element at logical `index` (0 = oldest), if any
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        self.slots[self.slot(index)].as_ref()
    }

    /// Mutable element at logical `index` (0 = oldest), if any
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let idx = self.slot(index);
        self.slots[idx].as_mut()
    }

    /// Element at logical `index`, bounds-checked against `len()`
    pub fn peek(&self, index: usize) -> KinesyncResult<&T> {
        let len = self.len();
        self.get(index)
            .ok_or(KinesyncError::IndexOutOfRange { index, len })
    }

    pub fn peek_mut(&mut self, index: usize) -> KinesyncResult<&mut T> {
        let len = self.len();
        self.get_mut(index)
            .ok_or(KinesyncError::IndexOutOfRange { index, len })
    }

    /// Oldest element
    pub fn peek_head(&self) -> KinesyncResult<&T> {
        if self.is_empty() {
            return Err(KinesyncError::BufferEmpty);
        }
        self.peek(0)
    }

    /// Newest element
    pub fn peek_tail(&self) -> KinesyncResult<&T> {
        if self.is_empty() {
            return Err(KinesyncError::BufferEmpty);
        }
        self.peek(self.len() - 1)
    }

    /// Drop all elements, keeping the storage
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            front: 0,
            back: self.len(),
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "ring buffer index out of range: {} (len {})",
                index,
                self.len()
            ),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        RingBuffer {
            slots: self.slots.clone(),
            mask: self.mask,
            head: self.head,
            tail: self.tail,
        }
    }
}

/// Oldest-to-newest iterator over a [`RingBuffer`]
pub struct Iter<'a, T> {
    ring: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.ring.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.ring.get(self.back)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn contents<T: Clone>(ring: &RingBuffer<T>) -> Vec<T> {
        ring.iter().cloned().collect()
    }

    #[test]
    fn test_capacity_rounding() {
        assert_eq!(RingBuffer::<u8>::new(0).capacity(), 1);
        assert_eq!(RingBuffer::<u8>::new(1).capacity(), 1);
        assert_eq!(RingBuffer::<u8>::new(3).capacity(), 4);
        assert_eq!(RingBuffer::<u8>::new(16).capacity(), 16);
        assert_eq!(RingBuffer::<u8>::new(17).capacity(), 32);
    }

    #[test]
    fn test_enqueue_evicts_oldest() {
        let mut ring = RingBuffer::new(4);
        for i in 0..10 {
            ring.enqueue(i);
        }
        assert_eq!(ring.len(), 4);
        assert_eq!(*ring.peek_head().unwrap(), 6);
        assert_eq!(*ring.peek_tail().unwrap(), 9);
        assert_eq!(contents(&ring), vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_push_evicts_newest() {
        let mut ring = RingBuffer::new(4);
        for i in 0..4 {
            ring.enqueue(i);
        }
        ring.push(-1);
        assert_eq!(contents(&ring), vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_push_into_empty_wraps_below_zero() {
        let mut ring = RingBuffer::new(4);
        ring.push(1);
        ring.push(0);
        ring.enqueue(2);
        assert_eq!(contents(&ring), vec![0, 1, 2]);
        assert_eq!(ring[0], 0);
        assert_eq!(ring[2], 2);
    }

    #[test]
    fn test_insert_at_offset() {
        let mut ring = RingBuffer::new(8);
        for i in [0, 1, 3, 4] {
            ring.enqueue(i);
        }
        ring.insert_at_offset_from_tail(2, 2).unwrap();
        assert_eq!(contents(&ring), vec![0, 1, 2, 3, 4]);

        // offset 0 appends, offset len prepends
        ring.insert_at_offset_from_tail(0, 5).unwrap();
        ring.insert_at_offset_from_tail(ring.len(), -1).unwrap();
        assert_eq!(contents(&ring), vec![-1, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_at_offset_out_of_range() {
        let mut ring = RingBuffer::new(4);
        ring.enqueue(1);
        assert_eq!(
            ring.insert_at_offset_from_tail(2, 0),
            Err(KinesyncError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(contents(&ring), vec![1]);
    }

    #[test]
    fn test_insert_when_full_evicts_oldest() {
        let mut ring = RingBuffer::new(4);
        for i in [0, 1, 3, 4] {
            ring.enqueue(i);
        }
        ring.insert_at_offset_from_tail(2, 2).unwrap();
        assert_eq!(contents(&ring), vec![1, 2, 3, 4]);

        // Landing on the oldest position of a full buffer is a no-op
        ring.insert_at_offset_from_tail(4, 0).unwrap();
        assert_eq!(contents(&ring), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_insert_after_wraparound() {
        let mut ring = RingBuffer::new(4);
        for i in 0..6 {
            ring.enqueue(i * 10);
        }
        ring.insert_at_offset_from_tail(1, 45).unwrap();
        assert_eq!(contents(&ring), vec![30, 40, 45, 50]);
    }

    #[test]
    fn test_peek_bounds() {
        let mut ring = RingBuffer::new(4);
        assert_eq!(ring.peek_head(), Err(KinesyncError::BufferEmpty));
        assert_eq!(ring.peek_tail(), Err(KinesyncError::BufferEmpty));

        ring.enqueue('a');
        ring.enqueue('b');
        assert_eq!(ring.peek(1), Ok(&'b'));
        // Capacity is 4 but only 2 slots are logically occupied
        assert_eq!(
            ring.peek(2),
            Err(KinesyncError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(ring.get(3).is_none());

        *ring.peek_mut(0).unwrap() = 'z';
        assert_eq!(ring[0], 'z');
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_index_panics_out_of_range() {
        let ring: RingBuffer<u8> = RingBuffer::new(4);
        let _ = ring[0];
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut ring = RingBuffer::new(5);
        for i in 0..5 {
            ring.enqueue(i);
        }
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 8);
        ring.enqueue(9);
        assert_eq!(contents(&ring), vec![9]);
    }

    #[test]
    fn test_iter_double_ended() {
        let mut ring = RingBuffer::new(4);
        for i in 0..6 {
            ring.enqueue(i);
        }
        let rev: Vec<_> = ring.iter().rev().copied().collect();
        assert_eq!(rev, vec![5, 4, 3, 2]);
        assert_eq!(ring.iter().len(), 4);
    }

    proptest! {
        #[test]
        fn prop_capacity_is_next_power_of_two(requested in 1usize..4096) {
            let cap = RingBuffer::<u8>::new(requested).capacity();
            prop_assert!(cap.is_power_of_two());
            prop_assert!(cap >= requested);
            prop_assert!(cap / 2 < requested);
        }

        #[test]
        fn prop_bounded_eviction(requested in 1usize..64, total in 0usize..300) {
            let mut ring = RingBuffer::new(requested);
            for i in 0..total {
                ring.enqueue(i);
            }
            let cap = ring.capacity();
            prop_assert_eq!(ring.len(), total.min(cap));
            if total > cap {
                prop_assert_eq!(*ring.peek_head().unwrap(), total - cap);
            }
        }

        #[test]
        fn prop_matches_vecdeque_model(ops in proptest::collection::vec((0u8..3, 0usize..20), 0..200)) {
            let mut ring = RingBuffer::new(8);
            let mut model = std::collections::VecDeque::new();
            for (n, (op, arg)) in ops.into_iter().enumerate() {
                match op {
                    0 => {
                        ring.enqueue(n);
                        model.push_back(n);
                        if model.len() > 8 {
                            model.pop_front();
                        }
                    }
                    1 => {
                        ring.push(n);
                        model.push_front(n);
                        if model.len() > 8 {
                            model.pop_back();
                        }
                    }
                    _ => {
                        let offset = arg.min(model.len());
                        ring.insert_at_offset_from_tail(offset, n).unwrap();
                        let index = model.len() - offset;
                        if model.len() == 8 {
                            if index > 0 {
                                model.pop_front();
                                model.insert(index - 1, n);
                            }
                        } else {
                            model.insert(index, n);
                        }
                    }
                }
                prop_assert_eq!(contents(&ring), model.iter().copied().collect::<Vec<_>>());
            }
        }
    }
}
