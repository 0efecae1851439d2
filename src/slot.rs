use std::sync::Arc;

/// Outcome of an insert-if-absent call.
///
/// Both variants carry the value now cached, so callers always continue with
/// the winning instance regardless of who installed it.
#[derive(Debug)]
pub enum Slot<V> {
	/// This call installed the value.
	Inserted(Arc<V>),
	/// A value was already present; the offered value was dropped.
	Occupied(Arc<V>),
}

impl<V> Slot<V> {
	/// Whether this call performed the insert.
	pub fn is_inserted(&self) -> bool {
		matches!(self, Slot::Inserted(_))
	}

	/// Borrow the cached value.
	pub fn get(&self) -> &Arc<V> {
		match self {
			Slot::Inserted(value) | Slot::Occupied(value) => value,
		}
	}

	/// Take the cached value.
	pub fn into_inner(self) -> Arc<V> {
		match self {
			Slot::Inserted(value) | Slot::Occupied(value) => value,
		}
	}
}
