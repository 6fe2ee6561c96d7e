//! In-memory search indexing for the media catalog.
//!
//! Entities live in a [`CatalogStore`]; document adapters project them into
//! token-bearing documents, [`SearchIndex`] answers keyword queries with ids,
//! and [`build`] rebuilds the per-kind indexes held by an [`IndexRegistry`].

pub mod build;
pub mod documents;
pub mod error;
pub mod index;
pub mod model;
pub mod profiler;
pub mod registry;
pub mod store;
pub mod tokenizer;

pub use build::{build_all, build_index, rebuild, reindex_entity, unindex_entity, BuildReport};
pub use documents::{
    ActorAdapter, ActorDoc, Document, DocumentAdapter, EntityRef, LabelAdapter, LabelDoc, LabelRecord,
    SceneAdapter, SceneDoc, StudioAdapter, StudioDoc,
};
pub use error::{Result, StoreError};
pub use index::{DocIndex, SearchIndex};
pub use model::{Actor, Corpus, EntityKind, Label, Scene, Studio};
pub use profiler::{estimate_bytes, estimate_size, format_size, HeapSize};
pub use registry::IndexRegistry;
pub use store::{CatalogStore, MemoryStore};
pub use tokenizer::{tokenize, tokenize_names, tokenize_unique, Token};
