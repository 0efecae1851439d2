//! Ordered collection searched by a caller-supplied match function.
//!
//! Used where cached values are matched by the handle they wrap rather than
//! by a hashable key. Lookups are linear in the number of entries.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::slot::Slot;

/// Thread-safe list of shared values kept in insertion order.
pub struct IdentityList<V> {
	entries: RwLock<Vec<Arc<V>>>,
}

impl<V> IdentityList<V> {
	/// Create an empty list.
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Create an empty list with room for `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: RwLock::new(Vec::with_capacity(capacity)),
		}
	}

	/// First entry, in insertion order, for which `matches` returns true.
	pub fn find<P>(&self, mut matches: P) -> Option<Arc<V>>
	where
		P: FnMut(&V) -> bool,
	{
		self.entries.read().iter().find(|entry| matches(entry)).cloned()
	}

	/// Append `value` unless an entry already satisfies `matches`.
	///
	/// The re-check and the append happen under one write lock.
	pub fn insert_if_absent<P>(&self, mut matches: P, value: Arc<V>) -> Slot<V>
	where
		P: FnMut(&V) -> bool,
	{
		let mut entries = self.entries.write();
		if let Some(existing) = entries.iter().find(|entry| matches(entry)) {
			return Slot::Occupied(existing.clone());
		}
		entries.push(value.clone());
		Slot::Inserted(value)
	}

	/// Like [`insert_if_absent`](Self::insert_if_absent), but appends only if
	/// `still_valid` returns true under the same write lock.
	///
	/// An existing match is returned without consulting `still_valid`.
	/// Returns `None`, leaving the list untouched, when the append is refused.
	pub fn insert_if_absent_when<P, C>(
		&self,
		mut matches: P,
		value: Arc<V>,
		still_valid: C,
	) -> Option<Slot<V>>
	where
		P: FnMut(&V) -> bool,
		C: FnOnce() -> bool,
	{
		let mut entries = self.entries.write();
		if let Some(existing) = entries.iter().find(|entry| matches(entry)) {
			return Some(Slot::Occupied(existing.clone()));
		}
		if !still_valid() {
			return None;
		}
		entries.push(value.clone());
		Some(Slot::Inserted(value))
	}

	/// Copy of all entries in insertion order.
	pub fn snapshot(&self) -> Vec<Arc<V>> {
		self.entries.read().clone()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Check if the list is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Remove every entry and return how many were dropped.
	pub fn clear(&self) -> usize {
		let mut entries = self.entries.write();
		let len = entries.len();
		entries.clear();
		len
	}

	/// Remove every entry, then run `also` before the write lock is released.
	///
	/// Returns how many entries were dropped together with the result of `also`.
	pub fn clear_with<R, A>(&self, also: A) -> (usize, R)
	where
		A: FnOnce() -> R,
	{
		let mut entries = self.entries.write();
		let len = entries.len();
		entries.clear();
		(len, also())
	}
}

impl<V> Default for IdentityList<V> {
	fn default() -> Self {
		Self::new()
	}
}
