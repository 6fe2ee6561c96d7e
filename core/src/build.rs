//! Full rebuilds and incremental updates of registry indexes.

use crate::documents::{
    ActorAdapter, DocumentAdapter, LabelAdapter, SceneAdapter, StudioAdapter,
};
use crate::error::Result;
use crate::model::EntityKind;
use crate::profiler;
use crate::registry::IndexRegistry;
use crate::store::CatalogStore;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub kind: EntityKind,
    pub indexed: usize,
    /// Entities whose document could not be built.
    pub skipped: usize,
    pub elapsed_ms: u64,
    pub memory: String,
}

/// Rebuild one kind's index from the store's full corpus.
///
/// Once the corpus is read the registry's instance is cleared in place, then
/// entities are adapted and added one at a time, in corpus order. Each add
/// takes the write lock on its own, so incremental updates that land during
/// the rebuild are kept. If the corpus itself cannot be read the installed
/// index is left as it was.
pub async fn rebuild<A: DocumentAdapter>(
    registry: &IndexRegistry,
    store: &dyn CatalogStore,
    adapter: &A,
) -> Result<BuildReport> {
    let start = Instant::now();
    let corpus = adapter.corpus(store).await?;
    tracing::debug!(kind = %A::KIND, entities = corpus.len(), "building index");

    let slot = A::slot(registry);
    slot.write().clear();

    let mut indexed = 0;
    let mut skipped = 0;
    for entity in &corpus {
        // no lock is held while adapting; adapters await the store
        match adapter.create_search_doc(store, entity).await {
            Ok(doc) => {
                slot.write().add(&doc);
                indexed += 1;
            }
            Err(err) => {
                skipped += 1;
                tracing::warn!(kind = %A::KIND, id = A::entity_id(entity), error = %err, "skipping entity");
            }
        }
    }

    let memory = profiler::estimate_size(&*slot.read());
    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        kind = %A::KIND,
        indexed,
        skipped,
        elapsed_ms,
        memory = %memory,
        "index built"
    );
    Ok(BuildReport { kind: A::KIND, indexed, skipped, elapsed_ms, memory })
}

pub async fn build_index(
    registry: &IndexRegistry,
    store: &dyn CatalogStore,
    kind: EntityKind,
) -> Result<BuildReport> {
    match kind {
        EntityKind::Studio => rebuild(registry, store, &StudioAdapter).await,
        EntityKind::Scene => rebuild(registry, store, &SceneAdapter).await,
        EntityKind::Actor => rebuild(registry, store, &ActorAdapter).await,
        EntityKind::Label => rebuild(registry, store, &LabelAdapter).await,
    }
}

/// Rebuild every kind, in [`EntityKind::ALL`] order.
pub async fn build_all(registry: &IndexRegistry, store: &dyn CatalogStore) -> Result<Vec<BuildReport>> {
    let mut reports = Vec::with_capacity(EntityKind::ALL.len());
    for kind in EntityKind::ALL {
        reports.push(build_index(registry, store, kind).await?);
    }
    Ok(reports)
}

/// Adapt a single changed entity and upsert it into its index.
pub async fn reindex_entity<A: DocumentAdapter>(
    registry: &IndexRegistry,
    store: &dyn CatalogStore,
    adapter: &A,
    entity: &A::Entity,
) -> Result<()> {
    let doc = adapter.create_search_doc(store, entity).await?;
    A::slot(registry).write().add(&doc);
    Ok(())
}

/// Drop a deleted entity from its index. Unknown ids are ignored.
pub fn unindex_entity(registry: &IndexRegistry, kind: EntityKind, id: &str) -> bool {
    registry.remove(kind, id)
}
