//! Sharded map with atomic insert-if-absent.
//!
//! Each key hashes to exactly one shard, so every `insert_if_absent` for the
//! same key is serialized by that shard's write lock and exactly one wins.

use std::hash::Hash;
use std::sync::Arc;

use ahash::RandomState;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use parking_lot::RwLock;

use crate::slot::Slot;

/// Default number of shards.
pub(crate) const DEFAULT_SHARD_COUNT: usize = 16;

/// Thread-safe keyed cache. Values are shared as `Arc<V>`.
pub struct KeyedCache<K, V> {
	/// Sharded storage
	shards: Box<[RwLock<HashMap<K, Arc<V>>>]>,
	/// Hasher used only for shard selection
	hasher: RandomState,
	/// Always a power of two
	shard_mask: usize,
}

impl<K, V> KeyedCache<K, V>
where
	K: Hash + Eq,
{
	/// Create a cache with the default shard count.
	pub fn new() -> Self {
		Self::with_shards(DEFAULT_SHARD_COUNT)
	}

	/// Create a cache with `shard_count` shards, rounded up to a power of two.
	pub fn with_shards(shard_count: usize) -> Self {
		let shard_count = shard_count.max(1).next_power_of_two();
		let shards = (0..shard_count).map(|_| RwLock::new(HashMap::new())).collect();

		Self {
			shards,
			hasher: RandomState::new(),
			shard_mask: shard_count - 1,
		}
	}

	/// Look up a value. Holds the shard's read lock only while cloning the `Arc`.
	pub fn get(&self, key: &K) -> Option<Arc<V>> {
		self.shard(key).read().get(key).cloned()
	}

	/// Install `value` under `key` unless a value is already present.
	///
	/// The check and the insert happen under a single write lock.
	pub fn insert_if_absent(&self, key: K, value: Arc<V>) -> Slot<V> {
		let mut shard = self.shard(&key).write();
		match shard.entry(key) {
			Entry::Occupied(occupied) => Slot::Occupied(occupied.get().clone()),
			Entry::Vacant(vacant) => Slot::Inserted(vacant.insert(value).clone()),
		}
	}

	/// Check if a key is present.
	pub fn contains(&self, key: &K) -> bool {
		self.shard(key).read().contains_key(key)
	}

	/// Number of entries across all shards.
	pub fn len(&self) -> usize {
		self.shards.iter().map(|shard| shard.read().len()).sum()
	}

	/// Check if the cache is empty.
	pub fn is_empty(&self) -> bool {
		self.shards.iter().all(|shard| shard.read().is_empty())
	}

	/// Number of shards.
	pub fn shard_count(&self) -> usize {
		self.shards.len()
	}

	/// Remove every entry and return how many were dropped.
	///
	/// All shard locks are taken in index order before anything is removed,
	/// so concurrent inserts land either entirely before or entirely after.
	pub fn clear(&self) -> usize {
		let mut guards: Vec<_> = self.shards.iter().map(|shard| shard.write()).collect();
		guards
			.iter_mut()
			.map(|shard| {
				let len = shard.len();
				shard.clear();
				len
			})
			.sum()
	}

	fn shard(&self, key: &K) -> &RwLock<HashMap<K, Arc<V>>> {
		let index = (self.hasher.hash_one(key) as usize) & self.shard_mask;
		&self.shards[index]
	}
}

impl<K, V> Default for KeyedCache<K, V>
where
	K: Hash + Eq,
{
	fn default() -> Self {
		Self::new()
	}
}
