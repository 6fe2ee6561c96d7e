//! Searchable projections of catalog entities.
//!
//! A document is a point-in-time snapshot built from an entity plus whatever
//! the store knows about its relations at call time. Only names and aliases
//! become tokens; flags, counts and ratings ride along for callers that want
//! to filter or rank on them.

use crate::error::Result;
use crate::index::DocIndex;
use crate::model::{Actor, EntityKind, Label, Scene, Studio};
use crate::registry::IndexRegistry;
use crate::store::CatalogStore;
use crate::tokenizer::{tokenize, tokenize_names, Token};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Something the index can consume with the default strategies.
pub trait Document {
    fn doc_id(&self) -> String;
    fn doc_tokens(&self) -> Vec<Token>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
}

impl From<Label> for LabelRecord {
    fn from(label: Label) -> Self {
        Self { id: label.id, name: label.name, aliases: label.aliases }
    }
}

/// A related entity carried by id and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

fn label_tokens(labels: &[LabelRecord]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for label in labels {
        tokens.extend(tokenize(&label.name));
        tokens.extend(tokenize_names(&label.aliases));
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioDoc {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub labels: Vec<LabelRecord>,
    pub bookmark: bool,
    pub favorite: bool,
    pub rating: Option<u8>,
    pub num_scenes: usize,
}

impl Document for StudioDoc {
    fn doc_id(&self) -> String {
        self.id.clone()
    }

    fn doc_tokens(&self) -> Vec<Token> {
        let mut tokens = tokenize(&self.name);
        tokens.extend(tokenize_names(&self.aliases));
        tokens.extend(label_tokens(&self.labels));
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDoc {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub labels: Vec<LabelRecord>,
    pub bookmark: bool,
    pub favorite: bool,
    pub rating: Option<u8>,
    pub num_scenes: usize,
}

impl Document for ActorDoc {
    fn doc_id(&self) -> String {
        self.id.clone()
    }

    fn doc_tokens(&self) -> Vec<Token> {
        let mut tokens = tokenize(&self.name);
        tokens.extend(tokenize_names(&self.aliases));
        tokens.extend(label_tokens(&self.labels));
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDoc {
    pub id: String,
    pub name: String,
    pub labels: Vec<LabelRecord>,
    pub studio: Option<EntityRef>,
    pub actors: Vec<EntityRef>,
    pub bookmark: bool,
    pub favorite: bool,
    pub rating: Option<u8>,
    pub num_actors: usize,
}

impl Document for SceneDoc {
    fn doc_id(&self) -> String {
        self.id.clone()
    }

    fn doc_tokens(&self) -> Vec<Token> {
        let mut tokens = tokenize(&self.name);
        tokens.extend(label_tokens(&self.labels));
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDoc {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub num_tagged: usize,
}

impl Document for LabelDoc {
    fn doc_id(&self) -> String {
        self.id.clone()
    }

    fn doc_tokens(&self) -> Vec<Token> {
        let mut tokens = tokenize(&self.name);
        tokens.extend(tokenize_names(&self.aliases));
        tokens
    }
}

/// Resolve label ids in order, omitting labels that no longer exist.
pub async fn resolve_labels(store: &dyn CatalogStore, ids: &[String]) -> Result<Vec<LabelRecord>> {
    let mut labels: Vec<LabelRecord> = Vec::with_capacity(ids.len());
    for id in ids {
        match store.label(id).await? {
            Some(label) => labels.push(label.into()),
            None => tracing::debug!(label = %id, "skipping missing label reference"),
        }
    }
    Ok(labels)
}

/// Per-kind projection from store entity to index document.
#[async_trait]
pub trait DocumentAdapter: Send + Sync {
    type Entity: Send + Sync;
    type Doc: Document + Send + Sync;

    const KIND: EntityKind;

    fn entity_id(entity: &Self::Entity) -> &str;

    /// The full corpus for this kind.
    async fn corpus(&self, store: &dyn CatalogStore) -> Result<Vec<Self::Entity>>;

    async fn create_search_doc(
        &self,
        store: &dyn CatalogStore,
        entity: &Self::Entity,
    ) -> Result<Self::Doc>;

    /// The registry slot this kind's documents live in.
    fn slot(registry: &IndexRegistry) -> &RwLock<DocIndex<Self::Doc>>;
}

pub struct StudioAdapter;
pub struct SceneAdapter;
pub struct ActorAdapter;
pub struct LabelAdapter;

#[async_trait]
impl DocumentAdapter for StudioAdapter {
    type Entity = Studio;
    type Doc = StudioDoc;

    const KIND: EntityKind = EntityKind::Studio;

    fn entity_id(entity: &Studio) -> &str {
        &entity.id
    }

    async fn corpus(&self, store: &dyn CatalogStore) -> Result<Vec<Studio>> {
        store.studios().await
    }

    async fn create_search_doc(&self, store: &dyn CatalogStore, studio: &Studio) -> Result<StudioDoc> {
        let labels = resolve_labels(store, &studio.labels).await?;
        let num_scenes = store.related_count(Self::KIND, &studio.id).await?;
        Ok(StudioDoc {
            id: studio.id.clone(),
            name: studio.name.clone(),
            aliases: studio.aliases.clone(),
            labels,
            bookmark: studio.bookmark,
            favorite: studio.favorite,
            rating: studio.rating,
            num_scenes,
        })
    }

    fn slot(registry: &IndexRegistry) -> &RwLock<DocIndex<StudioDoc>> {
        registry.studios()
    }
}

#[async_trait]
impl DocumentAdapter for ActorAdapter {
    type Entity = Actor;
    type Doc = ActorDoc;

    const KIND: EntityKind = EntityKind::Actor;

    fn entity_id(entity: &Actor) -> &str {
        &entity.id
    }

    async fn corpus(&self, store: &dyn CatalogStore) -> Result<Vec<Actor>> {
        store.actors().await
    }

    async fn create_search_doc(&self, store: &dyn CatalogStore, actor: &Actor) -> Result<ActorDoc> {
        let labels = resolve_labels(store, &actor.labels).await?;
        let num_scenes = store.related_count(Self::KIND, &actor.id).await?;
        Ok(ActorDoc {
            id: actor.id.clone(),
            name: actor.name.clone(),
            aliases: actor.aliases.clone(),
            labels,
            bookmark: actor.bookmark,
            favorite: actor.favorite,
            rating: actor.rating,
            num_scenes,
        })
    }

    fn slot(registry: &IndexRegistry) -> &RwLock<DocIndex<ActorDoc>> {
        registry.actors()
    }
}

#[async_trait]
impl DocumentAdapter for SceneAdapter {
    type Entity = Scene;
    type Doc = SceneDoc;

    const KIND: EntityKind = EntityKind::Scene;

    fn entity_id(entity: &Scene) -> &str {
        &entity.id
    }

    async fn corpus(&self, store: &dyn CatalogStore) -> Result<Vec<Scene>> {
        store.scenes().await
    }

    async fn create_search_doc(&self, store: &dyn CatalogStore, scene: &Scene) -> Result<SceneDoc> {
        let labels = resolve_labels(store, &scene.labels).await?;

        let studio = match &scene.studio {
            Some(id) => match store.studio(id).await? {
                Some(studio) => Some(EntityRef { id: studio.id, name: studio.name }),
                None => {
                    tracing::debug!(scene = %scene.id, studio = %id, "skipping missing studio reference");
                    None
                }
            },
            None => None,
        };

        let mut actors = Vec::with_capacity(scene.actors.len());
        for id in &scene.actors {
            match store.actor(id).await? {
                Some(actor) => actors.push(EntityRef { id: actor.id, name: actor.name }),
                None => tracing::debug!(scene = %scene.id, actor = %id, "skipping missing actor reference"),
            }
        }

        let num_actors = store.related_count(Self::KIND, &scene.id).await?;
        Ok(SceneDoc {
            id: scene.id.clone(),
            name: scene.name.clone(),
            labels,
            studio,
            actors,
            bookmark: scene.bookmark,
            favorite: scene.favorite,
            rating: scene.rating,
            num_actors,
        })
    }

    fn slot(registry: &IndexRegistry) -> &RwLock<DocIndex<SceneDoc>> {
        registry.scenes()
    }
}

#[async_trait]
impl DocumentAdapter for LabelAdapter {
    type Entity = Label;
    type Doc = LabelDoc;

    const KIND: EntityKind = EntityKind::Label;

    fn entity_id(entity: &Label) -> &str {
        &entity.id
    }

    async fn corpus(&self, store: &dyn CatalogStore) -> Result<Vec<Label>> {
        store.labels().await
    }

    async fn create_search_doc(&self, store: &dyn CatalogStore, label: &Label) -> Result<LabelDoc> {
        let num_tagged = store.related_count(Self::KIND, &label.id).await?;
        Ok(LabelDoc {
            id: label.id.clone(),
            name: label.name.clone(),
            aliases: label.aliases.clone(),
            num_tagged,
        })
    }

    fn slot(registry: &IndexRegistry) -> &RwLock<DocIndex<LabelDoc>> {
        registry.labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Corpus;
    use crate::store::MemoryStore;

    fn label(id: &str, name: &str, aliases: &[&str]) -> Label {
        Label {
            id: id.into(),
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new(Corpus {
            labels: vec![label("l1", "Outdoor", &["Outside"]), label("l2", "Beach", &[])],
            studios: vec![Studio {
                id: "st1".into(),
                name: "Jane Doe Studio".into(),
                aliases: vec!["JDS".into()],
                labels: vec!["l1".into(), "gone".into(), "l2".into()],
                favorite: true,
                bookmark: false,
                rating: Some(4),
            }],
            scenes: vec![Scene {
                id: "sc1".into(),
                name: "Sunset".into(),
                studio: Some("st-deleted".into()),
                actors: vec!["a1".into(), "a-deleted".into()],
                labels: vec!["l2".into()],
                favorite: false,
                bookmark: true,
                rating: None,
            }],
            actors: vec![Actor {
                id: "a1".into(),
                name: "Zoë".into(),
                aliases: vec![],
                labels: vec![],
                favorite: false,
                bookmark: false,
                rating: None,
            }],
        })
    }

    #[tokio::test]
    async fn studio_doc_omits_missing_labels() {
        let store = store();
        let studio = store.studio("st1").await.unwrap().unwrap();
        let doc = StudioAdapter.create_search_doc(&store, &studio).await.unwrap();

        let ids: Vec<_> = doc.labels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
        assert!(doc.favorite);
        assert_eq!(doc.rating, Some(4));
        assert_eq!(
            doc.doc_tokens(),
            vec!["jane", "doe", "studio", "jds", "outdoor", "outside", "beach"]
        );
    }

    #[tokio::test]
    async fn scene_doc_omits_missing_studio_and_actors() {
        let store = store();
        let scene = store.scene("sc1").await.unwrap().unwrap();
        let doc = SceneAdapter.create_search_doc(&store, &scene).await.unwrap();

        assert!(doc.studio.is_none());
        assert_eq!(doc.actors, vec![EntityRef { id: "a1".into(), name: "Zoë".into() }]);
        assert_eq!(doc.num_actors, 1);
        assert!(doc.bookmark);
        // actor names are carried, not tokenized
        assert_eq!(doc.doc_tokens(), vec!["sunset", "beach"]);
    }

    #[tokio::test]
    async fn label_doc_counts_tagged_items() {
        let store = store();
        let beach = store.label("l2").await.unwrap().unwrap();
        let doc = LabelAdapter.create_search_doc(&store, &beach).await.unwrap();
        assert_eq!(doc.num_tagged, 2);
        assert_eq!(doc.doc_id(), "l2");
    }
}
