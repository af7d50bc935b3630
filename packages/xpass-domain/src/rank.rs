use std::{collections::HashMap, hash::Hash};

/// Reorders hydrated items to follow `ranked`.
///
/// Items whose key is absent from `ranked` are dropped, ranked keys without an item are skipped,
/// and a key that appears twice in `ranked` yields its item once, at the first position.
pub fn restore_rank_order<K, T, F>(ranked: &[K], items: Vec<T>, key: F) -> Vec<T>
where
	K: Eq + Hash,
	F: Fn(&T) -> K,
{
	let mut by_key: HashMap<K, T> = items.into_iter().map(|item| (key(&item), item)).collect();

	ranked.iter().filter_map(|k| by_key.remove(k)).collect()
}
