//! Identity types for KineSync
//!
//! Every motion data source gets a small integer id. Ids are handed out by
//! an [`IdAllocator`], which reuses released ids before minting new ones so
//! that the id space stays dense while sources come and go.

use std::fmt;

use parking_lot::Mutex;

use crate::{KinesyncError, KinesyncResult};

/// Data source identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceId(pub u32);

impl SourceId {
    pub const ZERO: SourceId = SourceId(0);

    #[inline]
    pub fn new(id: u32) -> Self {
        SourceId(id)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct AllocatorState {
    /// First id this allocator issues
    first: u32,
    /// Next never-issued id
    next: u32,
    /// Released ids waiting for reuse
    free: Vec<u32>,
}

/// Thread-safe id allocator with a release/reuse free list
///
/// Sources may be created and torn down from different threads, so all
/// state lives behind a single lock.
#[derive(Debug, Default)]
pub struct IdAllocator {
    state: Mutex<AllocatorState>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose first fresh id is `first`
    pub fn starting_at(first: u32) -> Self {
        IdAllocator {
            state: Mutex::new(AllocatorState {
                first,
                next: first,
                free: Vec::new(),
            }),
        }
    }

    /// Allocate an id, preferring the most recently released one
    pub fn allocate(&self) -> KinesyncResult<SourceId> {
        let mut state = self.state.lock();
        if let Some(id) = state.free.pop() {
            return Ok(SourceId(id));
        }
        let id = state.next;
        state.next = id.checked_add(1).ok_or(KinesyncError::IdExhausted)?;
        Ok(SourceId(id))
    }

    /// Return an id to the pool
    ///
    /// Returns `false` if the id was never issued or is already free.
    pub fn release(&self, id: SourceId) -> bool {
        let mut state = self.state.lock();
        if id.0 < state.first || id.0 >= state.next || state.free.contains(&id.0) {
            return false;
        }
        state.free.push(id.0);
        true
    }

    /// Number of ids currently handed out
    pub fn in_use(&self) -> usize {
        let state = self.state.lock();
        (state.next - state.first) as usize - state.free.len()
    }
}
