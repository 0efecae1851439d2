//! Provider counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of provider activity.
///
/// Counters are monotonic for the life of the provider; `clear_cache` resets
/// only the entry counts.
///
/// # Example
///
/// ```
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use peripheral_provider::{DeviceHandle, Identity, Provider, WrapperFactory};
/// # #[derive(Clone, PartialEq)]
/// # struct Handle(Identity);
/// # impl DeviceHandle for Handle {
/// #     fn identity(&self) -> Identity { self.0 }
/// # }
/// # struct Device(Handle);
/// # struct Factory;
/// # impl WrapperFactory for Factory {
/// #     type Handle = Handle;
/// #     type Manager = ();
/// #     type Delegate = ();
/// #     type Device = Device;
/// #     type Error = Infallible;
/// #     fn create_delegate(&self, _: &Handle) -> Result<(), Infallible> { Ok(()) }
/// #     fn create_device(&self, _: &Arc<()>, h: &Handle, _: Arc<()>) -> Result<Device, Infallible> {
/// #         Ok(Device(h.clone()))
/// #     }
/// #     fn handle_of(device: &Device) -> &Handle { &device.0 }
/// # }
/// let provider = Provider::new(Factory);
/// let manager = Arc::new(());
/// let handle = Handle(Identity::new(uuid::Uuid::from_u128(1)));
///
/// provider.provide(&handle, &manager);
/// provider.provide(&handle, &manager);
///
/// let metrics = provider.metrics();
/// assert_eq!(metrics.device_hits, 1);
/// assert_eq!(metrics.devices_created, 1);
/// println!("Hit rate: {:.2}%", metrics.hit_rate() * 100.0);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetrics {
	/// Device lookups answered from the cache.
	pub device_hits: u64,
	/// Device lookups that fell through to the create path.
	pub device_misses: u64,
	/// Delegate lookups answered from the cache.
	pub delegate_hits: u64,
	/// Delegate lookups that fell through to construction.
	pub delegate_misses: u64,
	/// Device wrappers installed in the cache.
	pub devices_created: u64,
	/// Delegate wrappers installed in the cache.
	pub delegates_created: u64,
	/// Constructed candidates dropped because another caller installed first.
	pub races_lost: u64,
	/// Device candidates dropped because `clear_cache` ran while they were built.
	pub clear_retries: u64,
	/// Number of `clear_cache` calls.
	pub clears: u64,
	/// Device wrappers currently cached.
	pub device_count: usize,
	/// Delegate wrappers currently cached.
	pub delegate_count: usize,
}

impl ProviderMetrics {
	/// Device hit rate between 0.0 and 1.0.
	///
	/// Returns 0.0 if `provide` has never been called.
	pub fn hit_rate(&self) -> f64 {
		let total = self.device_hits + self.device_misses;
		if total == 0 {
			0.0
		} else {
			self.device_hits as f64 / total as f64
		}
	}

	/// Wrappers of both families installed in the cache.
	pub fn total_created(&self) -> u64 {
		self.devices_created + self.delegates_created
	}
}

/// Live counters owned by the provider.
#[derive(Debug, Default)]
pub(crate) struct Counters {
	pub device_hits: AtomicU64,
	pub device_misses: AtomicU64,
	pub delegate_hits: AtomicU64,
	pub delegate_misses: AtomicU64,
	pub devices_created: AtomicU64,
	pub delegates_created: AtomicU64,
	pub races_lost: AtomicU64,
	pub clear_retries: AtomicU64,
	pub clears: AtomicU64,
}

impl Counters {
	pub fn bump(counter: &AtomicU64) {
		counter.fetch_add(1, Ordering::Relaxed);
	}

	pub fn snapshot(&self, device_count: usize, delegate_count: usize) -> ProviderMetrics {
		ProviderMetrics {
			device_hits: self.device_hits.load(Ordering::Relaxed),
			device_misses: self.device_misses.load(Ordering::Relaxed),
			delegate_hits: self.delegate_hits.load(Ordering::Relaxed),
			delegate_misses: self.delegate_misses.load(Ordering::Relaxed),
			devices_created: self.devices_created.load(Ordering::Relaxed),
			delegates_created: self.delegates_created.load(Ordering::Relaxed),
			races_lost: self.races_lost.load(Ordering::Relaxed),
			clear_retries: self.clear_retries.load(Ordering::Relaxed),
			clears: self.clears.load(Ordering::Relaxed),
			device_count,
			delegate_count,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hit_rate_empty() {
		assert_eq!(ProviderMetrics::default().hit_rate(), 0.0);
	}

	#[test]
	fn test_snapshot_reads_counters() {
		let counters = Counters::default();
		Counters::bump(&counters.device_hits);
		Counters::bump(&counters.device_hits);
		Counters::bump(&counters.device_hits);
		Counters::bump(&counters.device_misses);
		Counters::bump(&counters.devices_created);
		Counters::bump(&counters.delegates_created);

		let metrics = counters.snapshot(1, 1);
		assert_eq!(metrics.hit_rate(), 0.75);
		assert_eq!(metrics.total_created(), 2);
		assert_eq!(metrics.device_count, 1);
	}
}
