use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::builder::ProviderBuilder;
use crate::error::ProviderError;
use crate::identity::Identity;
use crate::keyed::KeyedCache;
use crate::list::IdentityList;
use crate::metrics::{Counters, ProviderMetrics};
use crate::slot::Slot;
use crate::traits::{DeviceHandle, WrapperFactory};

/// Find-or-create cache holding at most one delegate wrapper and one device
/// wrapper per device identity.
///
/// Share it across threads by reference or via `Arc<Provider<F>>`. Every
/// method is synchronous and blocks only for the duration of a cache lock;
/// wrapper constructors always run outside the locks.
///
/// # Creation races
///
/// Two callers missing the cache for the same device at the same time may
/// both construct a candidate. The first to install it wins and every caller
/// gets the winner back; the losing candidate is dropped. Delegate and device
/// caches are locked separately. A device wrapper is only installed if no
/// `clear_cache` ran since its delegate was looked up, so every cached device
/// wrapper pairs with the delegate currently cached for its identity. A
/// candidate overtaken by a clear is dropped and the create path runs again.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// use peripheral_provider::{DeviceHandle, Identity, Provider, WrapperFactory};
///
/// #[derive(Clone, PartialEq)]
/// struct Handle(Identity);
///
/// impl DeviceHandle for Handle {
///     fn identity(&self) -> Identity {
///         self.0
///     }
/// }
///
/// struct Delegate;
///
/// struct Peripheral {
///     handle: Handle,
///     delegate: Arc<Delegate>,
/// }
///
/// struct Central;
///
/// struct Factory;
///
/// impl WrapperFactory for Factory {
///     type Handle = Handle;
///     type Manager = Central;
///     type Delegate = Delegate;
///     type Device = Peripheral;
///     type Error = Infallible;
///
///     fn create_delegate(&self, _handle: &Handle) -> Result<Delegate, Infallible> {
///         Ok(Delegate)
///     }
///
///     fn create_device(
///         &self,
///         _manager: &Arc<Central>,
///         handle: &Handle,
///         delegate: Arc<Delegate>,
///     ) -> Result<Peripheral, Infallible> {
///         Ok(Peripheral { handle: handle.clone(), delegate })
///     }
///
///     fn handle_of(device: &Peripheral) -> &Handle {
///         &device.handle
///     }
/// }
///
/// let provider = Provider::new(Factory);
/// let central = Arc::new(Central);
/// let handle = Handle(Identity::new(uuid::Uuid::from_u128(0xAABB)));
///
/// let first = provider.provide(&handle, &central);
/// let second = provider.provide(&handle, &central);
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(Arc::ptr_eq(&first.delegate, &provider.provide_delegate(&handle)));
/// ```
pub struct Provider<F: WrapperFactory> {
	factory: F,
	/// Delegate wrappers keyed by device identity
	delegates: KeyedCache<Identity, F::Delegate>,
	/// Device wrappers matched by the handle they wrap
	devices: IdentityList<F::Device>,
	/// Bumped by every `clear_cache`, only while the device list is write-locked
	generation: AtomicU64,
	counters: Counters,
}

impl<F: WrapperFactory> Provider<F> {
	/// Create a provider with default settings.
	///
	/// Use [`ProviderBuilder`] to tune the cache layout.
	pub fn new(factory: F) -> Self {
		ProviderBuilder::new(factory).build()
	}

	pub(crate) fn with_layout(factory: F, shard_count: usize, device_capacity: usize) -> Self {
		Self {
			factory,
			delegates: KeyedCache::with_shards(shard_count),
			devices: IdentityList::with_capacity(device_capacity),
			generation: AtomicU64::new(0),
			counters: Counters::default(),
		}
	}

	/// Return the cached delegate wrapper for `handle`, creating one on a miss.
	///
	/// A failed construction caches nothing.
	pub fn try_provide_delegate(
		&self,
		handle: &F::Handle,
	) -> Result<Arc<F::Delegate>, ProviderError<F::Error>> {
		let identity = handle.identity();

		if let Some(delegate) = self.delegates.get(&identity) {
			Counters::bump(&self.counters.delegate_hits);
			trace!(%identity, "delegate wrapper cache hit");
			return Ok(delegate);
		}
		Counters::bump(&self.counters.delegate_misses);

		let candidate = self.factory.create_delegate(handle).map_err(|source| {
			warn!(%identity, error = %source, "delegate wrapper construction failed");
			ProviderError::Delegate { identity, source }
		})?;

		match self.delegates.insert_if_absent(identity, Arc::new(candidate)) {
			Slot::Inserted(delegate) => {
				Counters::bump(&self.counters.delegates_created);
				debug!(%identity, "created delegate wrapper");
				Ok(delegate)
			}
			Slot::Occupied(delegate) => {
				Counters::bump(&self.counters.races_lost);
				debug!(%identity, "delegate wrapper creation race lost, using cached instance");
				Ok(delegate)
			}
		}
	}

	/// Return the cached device wrapper for `handle`, creating one on a miss.
	///
	/// A new device wrapper is built with the cached delegate wrapper for the
	/// same identity, creating that too if needed. A failed construction
	/// caches nothing for the wrapper that failed.
	pub fn try_provide(
		&self,
		handle: &F::Handle,
		manager: &Arc<F::Manager>,
	) -> Result<Arc<F::Device>, ProviderError<F::Error>> {
		if let Some(device) = self.find(handle) {
			Counters::bump(&self.counters.device_hits);
			trace!(identity = %handle.identity(), "device wrapper cache hit");
			return Ok(device);
		}
		Counters::bump(&self.counters.device_misses);

		self.create_and_insert(handle, manager)
	}

	/// Drop every cached wrapper of both families.
	///
	/// Both caches are emptied under the device list's write lock, so no
	/// device lookup observes one cache cleared and the other not.
	/// References already handed out stay valid; only later lookups see the
	/// empty cache and build fresh wrappers.
	pub fn clear_cache(&self) {
		let (devices, delegates) = self.devices.clear_with(|| {
			let delegates = self.delegates.clear();
			self.generation.fetch_add(1, Ordering::AcqRel);
			delegates
		});
		Counters::bump(&self.counters.clears);
		debug!(devices, delegates, "cleared provider cache");
	}

	/// Check if a device wrapper is cached for `handle`.
	pub fn contains(&self, handle: &F::Handle) -> bool {
		self.find(handle).is_some()
	}

	/// Number of cached device wrappers.
	pub fn device_count(&self) -> usize {
		self.devices.len()
	}

	/// Number of cached delegate wrappers.
	pub fn delegate_count(&self) -> usize {
		self.delegates.len()
	}

	/// All cached device wrappers in creation order.
	pub fn cached_devices(&self) -> Vec<Arc<F::Device>> {
		self.devices.snapshot()
	}

	/// The factory used to build wrappers.
	pub fn factory(&self) -> &F {
		&self.factory
	}

	/// Snapshot of the provider's counters.
	pub fn metrics(&self) -> ProviderMetrics {
		self.counters.snapshot(self.devices.len(), self.delegates.len())
	}

	fn create_and_insert(
		&self,
		handle: &F::Handle,
		manager: &Arc<F::Manager>,
	) -> Result<Arc<F::Device>, ProviderError<F::Error>> {
		let identity = handle.identity();

		loop {
			// Read before the delegate lookup: an unchanged generation at insert
			// time means the delegate is still the cached one.
			let generation = self.generation.load(Ordering::Acquire);
			let delegate = self.try_provide_delegate(handle)?;

			let candidate =
				self.factory.create_device(manager, handle, delegate).map_err(|source| {
					warn!(%identity, error = %source, "device wrapper construction failed");
					ProviderError::Device { identity, source }
				})?;

			let slot = self.devices.insert_if_absent_when(
				|device| F::handle_of(device) == handle,
				Arc::new(candidate),
				|| self.generation.load(Ordering::Acquire) == generation,
			);

			match slot {
				Some(Slot::Inserted(device)) => {
					Counters::bump(&self.counters.devices_created);
					debug!(%identity, "created device wrapper");
					return Ok(device);
				}
				Some(Slot::Occupied(device)) => {
					Counters::bump(&self.counters.races_lost);
					debug!(%identity, "device wrapper creation race lost, using cached instance");
					return Ok(device);
				}
				None => {
					Counters::bump(&self.counters.clear_retries);
					debug!(%identity, "cache cleared during device wrapper construction, retrying");
				}
			}
		}
	}

	fn find(&self, handle: &F::Handle) -> Option<Arc<F::Device>> {
		self.devices.find(|device| F::handle_of(device) == handle)
	}
}

impl<F> Provider<F>
where
	F: WrapperFactory<Error = Infallible>,
{
	/// Return the single delegate wrapper for `handle`'s identity.
	pub fn provide_delegate(&self, handle: &F::Handle) -> Arc<F::Delegate> {
		self.try_provide_delegate(handle).unwrap_or_else(|err| err.unreachable())
	}

	/// Return the single device wrapper for `handle`.
	pub fn provide(&self, handle: &F::Handle, manager: &Arc<F::Manager>) -> Arc<F::Device> {
		self.try_provide(handle, manager).unwrap_or_else(|err| err.unreachable())
	}
}
