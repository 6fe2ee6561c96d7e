//! In-memory inverted index over arbitrary documents.
//!
//! The index keeps only derived tokens and ids, never the documents
//! themselves. Search returns ids; callers re-resolve them against the
//! store that owns the entities.
//!
//! Invariants held after every public call:
//! - every id in a posting has a document record
//! - no posting is empty
//! - re-adding an id replaces all of its previous postings

use crate::documents::Document;
use crate::tokenizer::{tokenize_unique, Token};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// Index over catalog documents keyed by their string id.
pub type DocIndex<D> = SearchIndex<D, String>;

/// Per-id record: insertion order plus the token multiset seen at add time.
#[derive(Debug, Clone)]
pub(crate) struct IndexedDoc {
    pub(crate) seq: u64,
    pub(crate) tokens: Vec<Token>,
}

/// Generic inverted index.
///
/// `T` turns a document into tokens and `I` extracts its unique id. Both are
/// plain function pointers by default, so per-kind indexes can be named
/// without spelling out closure types.
pub struct SearchIndex<D, K, T = fn(&D) -> Vec<Token>, I = fn(&D) -> K> {
    tokenizer: T,
    id_of: I,
    query_tokenizer: fn(&str) -> Vec<Token>,
    /// token -> id -> term frequency
    postings: HashMap<Token, HashMap<K, u32>>,
    docs: HashMap<K, IndexedDoc>,
    next_seq: u64,
    _doc: PhantomData<fn(&D)>,
}

impl<D: Document> SearchIndex<D, String> {
    /// Index using the document's own id and token projection.
    pub fn for_documents() -> Self {
        SearchIndex::new(
            D::doc_tokens as fn(&D) -> Vec<Token>,
            D::doc_id as fn(&D) -> String,
        )
    }
}

impl<D: Document> Default for SearchIndex<D, String> {
    fn default() -> Self {
        Self::for_documents()
    }
}

impl<D, K, T, I> SearchIndex<D, K, T, I>
where
    K: Eq + Hash + Clone,
    T: Fn(&D) -> Vec<Token>,
    I: Fn(&D) -> K,
{
    pub fn new(tokenizer: T, id_of: I) -> Self {
        Self {
            tokenizer,
            id_of,
            query_tokenizer: tokenize_unique,
            postings: HashMap::new(),
            docs: HashMap::new(),
            next_seq: 0,
            _doc: PhantomData,
        }
    }

    /// Replace the function used to tokenize search queries. It should
    /// normalize the same way the document tokenizer does and return each
    /// token once; a repeated query token is counted as another match.
    pub fn with_query_tokenizer(mut self, query_tokenizer: fn(&str) -> Vec<Token>) -> Self {
        self.query_tokenizer = query_tokenizer;
        self
    }

    /// Index a document, replacing whatever was indexed under its id before.
    ///
    /// An update keeps the id's original position for tie-breaking.
    pub fn add(&mut self, doc: &D) {
        let id = (self.id_of)(doc);
        let tokens = (self.tokenizer)(doc);

        let seq = match self.docs.get(&id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.remove(&id);

        for token in &tokens {
            *self
                .postings
                .entry(token.clone())
                .or_default()
                .entry(id.clone())
                .or_insert(0) += 1;
        }
        self.docs.insert(id, IndexedDoc { seq, tokens });
    }

    /// Remove every trace of `id`. Returns false if it was not indexed.
    pub fn remove<Q>(&mut self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(doc) = self.docs.remove(id) else {
            return false;
        };
        for token in &doc.tokens {
            if let Some(ids) = self.postings.get_mut(token) {
                ids.remove(id);
                if ids.is_empty() {
                    self.postings.remove(token);
                }
            }
        }
        true
    }

    /// Number of indexed ids.
    pub fn size(&self) -> usize {
        self.docs.len()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.docs.contains_key(id)
    }

    /// Number of distinct tokens with a live posting.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    /// Ids posted under `token`, in indexing order.
    pub fn postings(&self, token: &str) -> Option<Vec<K>> {
        let ids = self.postings.get(token)?;
        let mut ids: Vec<&K> = ids.keys().collect();
        ids.sort_by_key(|id| self.seq_of(id));
        Some(ids.into_iter().cloned().collect())
    }

    pub fn term_frequency<Q>(&self, token: &str, id: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.postings
            .get(token)
            .and_then(|ids| ids.get(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.docs.clear();
        self.next_seq = 0;
    }

    /// Ids matching at least one query token, best first.
    ///
    /// Ranked by number of distinct query tokens matched, then summed term
    /// frequency over those tokens, then indexing order.
    pub fn search(&self, query: &str) -> Vec<K> {
        self.ranked(query).into_iter().cloned().collect()
    }

    /// One page of [`search`](Self::search) results.
    pub fn search_page(&self, query: &str, skip: usize, take: usize) -> Vec<K> {
        self.ranked(query)
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect()
    }

    fn ranked(&self, query: &str) -> Vec<&K> {
        // id -> (distinct tokens matched, summed tf)
        let mut hits: HashMap<&K, (usize, u64)> = HashMap::new();
        for term in (self.query_tokenizer)(query) {
            let Some(ids) = self.postings.get(&term) else {
                continue;
            };
            for (id, tf) in ids {
                let hit = hits.entry(id).or_insert((0, 0));
                hit.0 += 1;
                hit.1 += u64::from(*tf);
            }
        }

        let mut ranked: Vec<(&K, usize, u64, u64)> = hits
            .into_iter()
            .map(|(id, (matched, tf))| (id, matched, tf, self.seq_of(id)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| a.3.cmp(&b.3))
        });
        ranked.into_iter().map(|(id, ..)| id).collect()
    }

    fn seq_of(&self, id: &K) -> u64 {
        self.docs.get(id).map(|d| d.seq).unwrap_or(u64::MAX)
    }

    pub(crate) fn posting_map(&self) -> &HashMap<Token, HashMap<K, u32>> {
        &self.postings
    }

    pub(crate) fn doc_records(&self) -> &HashMap<K, IndexedDoc> {
        &self.docs
    }
}
