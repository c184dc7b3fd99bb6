//! Source registry - who is feeding motion data
//!
//! Sources come and go from whatever thread owns the network receiver, so
//! the registry is shared behind an `Arc` and locks internally.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use kinesync_core::{IdAllocator, KinesyncError, KinesyncResult, SourceId};

/// Kind of motion a source produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    Body,
    Finger,
    Face,
    Eye,
}

impl MotionKind {
    pub fn all() -> &'static [MotionKind] {
        &[
            MotionKind::Body,
            MotionKind::Finger,
            MotionKind::Face,
            MotionKind::Eye,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            MotionKind::Body => "body",
            MotionKind::Finger => "finger",
            MotionKind::Face => "face",
            MotionKind::Eye => "eye",
        }
    }
}

/// Registered source description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    pub kind: MotionKind,
}

#[derive(Debug, Default)]
struct RegistryInner {
    ids: IdAllocator,
    sources: RwLock<HashMap<SourceId, SourceInfo>>,
}

impl RegistryInner {
    fn unregister(&self, id: SourceId) -> KinesyncResult<SourceInfo> {
        let info = self
            .sources
            .write()
            .remove(&id)
            .ok_or(KinesyncError::UnknownSource(id))?;
        self.ids.release(id);
        tracing::debug!(%id, name = %info.name, kind = info.kind.name(), "source unregistered");
        Ok(info)
    }
}

/// Thread-safe registry of live sources
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    inner: Arc<RegistryInner>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source; it stays registered until the handle is dropped
    pub fn register(&self, name: impl Into<String>, kind: MotionKind) -> KinesyncResult<SourceHandle> {
        let id = self.inner.ids.allocate()?;
        let info = SourceInfo {
            id,
            name: name.into(),
            kind,
        };
        tracing::debug!(%id, name = %info.name, kind = kind.name(), "source registered");
        self.inner.sources.write().insert(id, info);

        Ok(SourceHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        })
    }

    pub fn get(&self, id: SourceId) -> Option<SourceInfo> {
        self.inner.sources.read().get(&id).cloned()
    }

    /// Live sources, ordered by id
    pub fn sources(&self) -> Vec<SourceInfo> {
        let mut sources: Vec<_> = self.inner.sources.read().values().cloned().collect();
        sources.sort_by_key(|s| s.id);
        sources
    }

    /// Live sources of one kind, ordered by id
    pub fn sources_of(&self, kind: MotionKind) -> Vec<SourceInfo> {
        let mut sources = self.sources();
        sources.retain(|s| s.kind == kind);
        sources
    }

    pub fn len(&self) -> usize {
        self.inner.sources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration guard; unregisters the source (and frees its id) on drop
#[derive(Debug)]
pub struct SourceHandle {
    id: SourceId,
    registry: Weak<RegistryInner>,
}

impl SourceHandle {
    pub fn id(&self) -> SourceId {
        self.id
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let _ = registry.unregister(self.id);
        }
    }
}
