//! Named index instances, one per entity kind.
//!
//! The registry is created explicitly and handed to whatever needs it; there
//! is no process-wide index state. Each instance sits behind its own lock so
//! a rebuild of one kind never blocks searches on another.

use crate::documents::{ActorDoc, LabelDoc, SceneDoc, StudioDoc};
use crate::index::DocIndex;
use crate::model::EntityKind;
use crate::profiler;
use parking_lot::RwLock;

/// Run `$body` with `$index` bound to the lock for `$kind`.
macro_rules! on_index {
    ($registry:expr, $kind:expr, $index:ident => $body:expr) => {
        match $kind {
            EntityKind::Studio => {
                let $index = &$registry.studios;
                $body
            }
            EntityKind::Scene => {
                let $index = &$registry.scenes;
                $body
            }
            EntityKind::Actor => {
                let $index = &$registry.actors;
                $body
            }
            EntityKind::Label => {
                let $index = &$registry.labels;
                $body
            }
        }
    };
}

#[derive(Default)]
pub struct IndexRegistry {
    studios: RwLock<DocIndex<StudioDoc>>,
    scenes: RwLock<DocIndex<SceneDoc>>,
    actors: RwLock<DocIndex<ActorDoc>>,
    labels: RwLock<DocIndex<LabelDoc>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn studios(&self) -> &RwLock<DocIndex<StudioDoc>> {
        &self.studios
    }

    pub fn scenes(&self) -> &RwLock<DocIndex<SceneDoc>> {
        &self.scenes
    }

    pub fn actors(&self) -> &RwLock<DocIndex<ActorDoc>> {
        &self.actors
    }

    pub fn labels(&self) -> &RwLock<DocIndex<LabelDoc>> {
        &self.labels
    }

    pub fn size(&self, kind: EntityKind) -> usize {
        on_index!(self, kind, index => index.read().size())
    }

    pub fn search(&self, kind: EntityKind, query: &str) -> Vec<String> {
        on_index!(self, kind, index => index.read().search(query))
    }

    pub fn search_page(&self, kind: EntityKind, query: &str, skip: usize, take: usize) -> Vec<String> {
        on_index!(self, kind, index => index.read().search_page(query, skip, take))
    }

    pub fn remove(&self, kind: EntityKind, id: &str) -> bool {
        on_index!(self, kind, index => index.write().remove(id))
    }

    pub fn estimate_size(&self, kind: EntityKind) -> String {
        on_index!(self, kind, index => profiler::estimate_size(&*index.read()))
    }

    /// Empty every instance.
    pub fn reset(&self) {
        for kind in EntityKind::ALL {
            on_index!(self, kind, index => index.write().clear());
        }
    }
}
