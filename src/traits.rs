use std::error::Error as StdError;
use std::sync::Arc;

use crate::identity::Identity;

/// A handle to an external device, as handed out by the platform layer.
///
/// Equality must agree with [`identity`](DeviceHandle::identity): two handles
/// compare equal exactly when they report the same identity.
///
/// # Example
///
/// ```
/// use peripheral_provider::{DeviceHandle, Identity};
/// use uuid::Uuid;
///
/// #[derive(Clone, PartialEq)]
/// struct Handle(Uuid);
///
/// impl DeviceHandle for Handle {
///     fn identity(&self) -> Identity {
///         Identity::new(self.0)
///     }
/// }
/// ```
pub trait DeviceHandle: Clone + PartialEq + Send + Sync + 'static {
	/// Stable identity of the device behind this handle.
	fn identity(&self) -> Identity;
}

/// Constructs the two wrapper families cached by a [`Provider`](crate::Provider).
///
/// The provider treats both constructors as black boxes. They are never
/// called while a cache lock is held, so a factory may itself call back into
/// the provider. Under a creation race a constructed wrapper can be dropped
/// without ever being returned.
///
/// Factories that cannot fail should use [`Infallible`](std::convert::Infallible)
/// as their error type, which unlocks [`Provider::provide`](crate::Provider::provide)
/// and [`Provider::provide_delegate`](crate::Provider::provide_delegate).
pub trait WrapperFactory: Send + Sync {
	/// Device handle type accepted by the provider.
	type Handle: DeviceHandle;

	/// Manager passed through to every device wrapper. Never inspected.
	type Manager: ?Sized + Send + Sync;

	/// Receiver of asynchronous events for one device.
	type Delegate: Send + Sync + 'static;

	/// Higher-level wrapper representing one device.
	type Device: Send + Sync + 'static;

	/// Error produced by a failed construction.
	type Error: StdError + Send + Sync + 'static;

	/// Build a new delegate wrapper for `handle`.
	fn create_delegate(&self, handle: &Self::Handle) -> Result<Self::Delegate, Self::Error>;

	/// Build a new device wrapper wired to `delegate`.
	fn create_device(
		&self,
		manager: &Arc<Self::Manager>,
		handle: &Self::Handle,
		delegate: Arc<Self::Delegate>,
	) -> Result<Self::Device, Self::Error>;

	/// The handle a device wrapper was built from.
	///
	/// Used to match cached device wrappers against incoming handles.
	fn handle_of(device: &Self::Device) -> &Self::Handle;
}
