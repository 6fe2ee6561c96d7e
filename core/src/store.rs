//! The authoritative entity store the index is built from.
//!
//! The index never owns domain state: builds enumerate the store, adapters
//! enrich entities from it, and query callers re-resolve hits against it.

use crate::error::Result;
use crate::model::{Actor, Corpus, EntityKind, Label, Scene, Studio};
use async_trait::async_trait;
use parking_lot::RwLock;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn studios(&self) -> Result<Vec<Studio>>;
    async fn scenes(&self) -> Result<Vec<Scene>>;
    async fn actors(&self) -> Result<Vec<Actor>>;
    async fn labels(&self) -> Result<Vec<Label>>;

    async fn studio(&self, id: &str) -> Result<Option<Studio>>;
    async fn scene(&self, id: &str) -> Result<Option<Scene>>;
    async fn actor(&self, id: &str) -> Result<Option<Actor>>;
    async fn label(&self, id: &str) -> Result<Option<Label>>;

    /// Scenes for a studio or actor, actors for a scene, tagged items for a label.
    async fn related_count(&self, kind: EntityKind, id: &str) -> Result<usize>;
}

/// In-memory store over a [`Corpus`] snapshot.
#[derive(Default)]
pub struct MemoryStore {
    corpus: RwLock<Corpus>,
}

impl MemoryStore {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus: RwLock::new(corpus) }
    }

    pub fn upsert_studio(&self, studio: Studio) {
        upsert(&mut self.corpus.write().studios, studio, |s| &s.id);
    }

    pub fn upsert_scene(&self, scene: Scene) {
        upsert(&mut self.corpus.write().scenes, scene, |s| &s.id);
    }

    pub fn upsert_actor(&self, actor: Actor) {
        upsert(&mut self.corpus.write().actors, actor, |a| &a.id);
    }

    pub fn upsert_label(&self, label: Label) {
        upsert(&mut self.corpus.write().labels, label, |l| &l.id);
    }

    /// Delete an entity of any kind. Returns whether it existed.
    ///
    /// References to it from other entities are left dangling, as a
    /// concurrent delete in a real store would.
    pub fn delete(&self, kind: EntityKind, id: &str) -> bool {
        let mut corpus = self.corpus.write();
        match kind {
            EntityKind::Studio => remove_by_id(&mut corpus.studios, id, |s| &s.id),
            EntityKind::Scene => remove_by_id(&mut corpus.scenes, id, |s| &s.id),
            EntityKind::Actor => remove_by_id(&mut corpus.actors, id, |a| &a.id),
            EntityKind::Label => remove_by_id(&mut corpus.labels, id, |l| &l.id),
        }
    }
}

fn upsert<T, F>(items: &mut Vec<T>, item: T, id_of: F)
where
    F: Fn(&T) -> &String,
{
    match items.iter_mut().find(|existing| id_of(existing) == id_of(&item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn remove_by_id<T, F>(items: &mut Vec<T>, id: &str, id_of: F) -> bool
where
    F: Fn(&T) -> &String,
{
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    items.len() != before
}

fn find_by_id<T: Clone, F>(items: &[T], id: &str, id_of: F) -> Option<T>
where
    F: Fn(&T) -> &String,
{
    items.iter().find(|item| id_of(item) == id).cloned()
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn studios(&self) -> Result<Vec<Studio>> {
        Ok(self.corpus.read().studios.clone())
    }

    async fn scenes(&self) -> Result<Vec<Scene>> {
        Ok(self.corpus.read().scenes.clone())
    }

    async fn actors(&self) -> Result<Vec<Actor>> {
        Ok(self.corpus.read().actors.clone())
    }

    async fn labels(&self) -> Result<Vec<Label>> {
        Ok(self.corpus.read().labels.clone())
    }

    async fn studio(&self, id: &str) -> Result<Option<Studio>> {
        Ok(find_by_id(&self.corpus.read().studios, id, |s| &s.id))
    }

    async fn scene(&self, id: &str) -> Result<Option<Scene>> {
        Ok(find_by_id(&self.corpus.read().scenes, id, |s| &s.id))
    }

    async fn actor(&self, id: &str) -> Result<Option<Actor>> {
        Ok(find_by_id(&self.corpus.read().actors, id, |a| &a.id))
    }

    async fn label(&self, id: &str) -> Result<Option<Label>> {
        Ok(find_by_id(&self.corpus.read().labels, id, |l| &l.id))
    }

    async fn related_count(&self, kind: EntityKind, id: &str) -> Result<usize> {
        let corpus = self.corpus.read();
        let count = match kind {
            EntityKind::Studio => corpus
                .scenes
                .iter()
                .filter(|s| s.studio.as_deref() == Some(id))
                .count(),
            EntityKind::Actor => corpus
                .scenes
                .iter()
                .filter(|s| s.actors.iter().any(|a| a == id))
                .count(),
            EntityKind::Scene => corpus
                .scenes
                .iter()
                .find(|s| s.id == id)
                .map(|s| {
                    s.actors
                        .iter()
                        .filter(|a| corpus.actors.iter().any(|actor| &actor.id == *a))
                        .count()
                })
                .unwrap_or(0),
            EntityKind::Label => {
                let tagged = |labels: &[String]| labels.iter().any(|l| l == id);
                corpus.studios.iter().filter(|s| tagged(&s.labels[..])).count()
                    + corpus.scenes.iter().filter(|s| tagged(&s.labels[..])).count()
                    + corpus.actors.iter().filter(|a| tagged(&a.labels[..])).count()
            }
        };
        Ok(count)
    }
}
