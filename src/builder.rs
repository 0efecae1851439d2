use crate::keyed::DEFAULT_SHARD_COUNT;
use crate::provider::Provider;
use crate::traits::WrapperFactory;

/// Builder for configuring a [`Provider`].
///
/// # Example
///
/// ```
/// # use std::convert::Infallible;
/// # use std::sync::Arc;
/// # use peripheral_provider::{DeviceHandle, Identity, WrapperFactory};
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
/// # let factory = Factory;
/// use peripheral_provider::ProviderBuilder;
///
/// let provider = ProviderBuilder::new(factory)
///     .shards(64)
///     .device_capacity(32)
///     .build();
///
/// let handle = Handle(Identity::new(uuid::Uuid::from_u128(1)));
/// provider.provide(&handle, &Arc::new(()));
/// assert_eq!(provider.device_count(), 1);
/// ```
pub struct ProviderBuilder<F> {
	factory: F,
	shard_count: usize,
	device_capacity: usize,
}

impl<F: WrapperFactory> ProviderBuilder<F> {
	/// Create a builder around the factory that constructs wrappers.
	pub fn new(factory: F) -> Self {
		Self {
			factory,
			shard_count: DEFAULT_SHARD_COUNT,
			device_capacity: 0,
		}
	}

	/// Set the number of delegate cache shards.
	///
	/// More shards reduce contention when many identities are looked up at
	/// once. Will be rounded up to the next power of 2.
	///
	/// Default: 16 shards
	pub fn shards(mut self, count: usize) -> Self {
		assert!(count > 0, "shard count must be greater than zero");
		self.shard_count = count;
		self
	}

	/// Reserve room for `capacity` device wrappers up front.
	///
	/// Default: 0
	pub fn device_capacity(mut self, capacity: usize) -> Self {
		self.device_capacity = capacity;
		self
	}

	/// Build the provider with the configured settings.
	pub fn build(self) -> Provider<F> {
		Provider::with_layout(self.factory, self.shard_count, self.device_capacity)
	}
}

#[cfg(test)]
mod tests {
	use std::convert::Infallible;
	use std::sync::Arc;

	use uuid::Uuid;

	use super::*;
	use crate::identity::Identity;
	use crate::traits::DeviceHandle;

	#[derive(Clone, PartialEq)]
	struct Handle(Identity);

	impl DeviceHandle for Handle {
		fn identity(&self) -> Identity {
			self.0
		}
	}

	struct Factory;

	impl WrapperFactory for Factory {
		type Handle = Handle;
		type Manager = ();
		type Delegate = ();
		type Device = Handle;
		type Error = Infallible;

		fn create_delegate(&self, _handle: &Handle) -> Result<(), Infallible> {
			Ok(())
		}

		fn create_device(
			&self,
			_manager: &Arc<()>,
			handle: &Handle,
			_delegate: Arc<()>,
		) -> Result<Handle, Infallible> {
			Ok(handle.clone())
		}

		fn handle_of(device: &Handle) -> &Handle {
			device
		}
	}

	#[test]
	fn test_builder_default() {
		let provider = ProviderBuilder::new(Factory).build();
		assert_eq!(provider.device_count(), 0);
		assert_eq!(provider.delegate_count(), 0);
	}

	#[test]
	fn test_builder_with_layout() {
		let provider = ProviderBuilder::new(Factory).shards(3).device_capacity(8).build();
		let handle = Handle(Identity::new(Uuid::from_u128(9)));
		provider.provide(&handle, &Arc::new(()));
		assert!(provider.contains(&handle));
	}

	#[test]
	#[should_panic(expected = "shard count must be greater than zero")]
	fn test_builder_invalid_shards() {
		ProviderBuilder::new(Factory).shards(0).build();
	}
}
