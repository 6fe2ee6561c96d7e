//! Rough memory footprint of an index, for operator diagnostics only.

use crate::index::SearchIndex;
use crate::tokenizer::Token;
use std::collections::HashMap;
use std::hash::Hash;
use std::mem::size_of;

/// Heap bytes owned by a value beyond its inline size.
pub trait HeapSize {
    fn heap_size(&self) -> usize;
}

impl HeapSize for String {
    fn heap_size(&self) -> usize {
        self.capacity()
    }
}

impl HeapSize for u32 {
    fn heap_size(&self) -> usize {
        0
    }
}

impl HeapSize for u64 {
    fn heap_size(&self) -> usize {
        0
    }
}

/// Estimated bytes held by the postings and document records of `index`,
/// or `None` if the traversal found something it cannot account for.
pub fn estimate_bytes<D, K, T, I>(index: &SearchIndex<D, K, T, I>) -> Option<usize>
where
    K: Eq + Hash + Clone + HeapSize,
    T: Fn(&D) -> Vec<Token>,
    I: Fn(&D) -> K,
{
    let key_bytes = |id: &K| size_of::<K>().checked_add(id.heap_size());
    let token_bytes = |token: &Token| size_of::<Token>().checked_add(token.heap_size());
    let mut total: usize = 0;

    for (token, ids) in index.posting_map() {
        total = total
            .checked_add(token_bytes(token)?)?
            .checked_add(size_of::<HashMap<K, u32>>())?;
        for id in ids.keys() {
            total = total
                .checked_add(key_bytes(id)?)?
                .checked_add(size_of::<u32>())?;
        }
    }

    for (id, doc) in index.doc_records() {
        total = total
            .checked_add(key_bytes(id)?)?
            .checked_add(size_of::<u64>() + size_of::<Vec<Token>>())?;
        for token in &doc.tokens {
            total = total.checked_add(token_bytes(token)?)?;
        }
    }

    Some(total)
}

/// Human-readable footprint of `index`, `"unknown"` if it cannot be estimated.
pub fn estimate_size<D, K, T, I>(index: &SearchIndex<D, K, T, I>) -> String
where
    K: Eq + Hash + Clone + HeapSize,
    T: Fn(&D) -> Vec<Token>,
    I: Fn(&D) -> K,
{
    match estimate_bytes(index) {
        Some(bytes) => format_size(bytes),
        None => {
            tracing::warn!(
                docs = index.size(),
                tokens = index.token_count(),
                "memory estimate overflowed"
            );
            "unknown".to_string()
        }
    }
}

pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
