//! # Peripheral Provider
//!
//! A concurrent find-or-create cache that guarantees **at most one wrapper
//! per device identity** for two wrapper families:
//! - **Delegate wrappers** receive asynchronous events for one device
//! - **Device wrappers** represent the device and are wired to its delegate
//!
//! Repeated lookups of the same device, even when they race across threads,
//! always yield the same `Arc`. This avoids duplicate per-device state and
//! duplicate event subscriptions.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use peripheral_provider::{DeviceHandle, Identity, Provider, WrapperFactory};
//!
//! #[derive(Clone, PartialEq)]
//! struct Handle(Identity);
//!
//! impl DeviceHandle for Handle {
//!     fn identity(&self) -> Identity {
//!         self.0
//!     }
//! }
//!
//! struct Delegate;
//!
//! struct Peripheral {
//!     handle: Handle,
//!     delegate: Arc<Delegate>,
//! }
//!
//! struct Factory;
//!
//! impl WrapperFactory for Factory {
//!     type Handle = Handle;
//!     type Manager = ();
//!     type Delegate = Delegate;
//!     type Device = Peripheral;
//!     type Error = Infallible;
//!
//!     fn create_delegate(&self, _handle: &Handle) -> Result<Delegate, Infallible> {
//!         Ok(Delegate)
//!     }
//!
//!     fn create_device(
//!         &self,
//!         _manager: &Arc<()>,
//!         handle: &Handle,
//!         delegate: Arc<Delegate>,
//!     ) -> Result<Peripheral, Infallible> {
//!         Ok(Peripheral { handle: handle.clone(), delegate })
//!     }
//!
//!     fn handle_of(device: &Peripheral) -> &Handle {
//!         &device.handle
//!     }
//! }
//!
//! let provider = Provider::new(Factory);
//! let manager = Arc::new(());
//! let handle = Handle(Identity::new(uuid::Uuid::from_u128(0xAABB)));
//!
//! let peripheral = provider.provide(&handle, &manager);
//! assert!(Arc::ptr_eq(&peripheral, &provider.provide(&handle, &manager)));
//!
//! // Clearing only affects later lookups
//! provider.clear_cache();
//! assert!(!Arc::ptr_eq(&peripheral, &provider.provide(&handle, &manager)));
//! ```
//!
//! ## Thread Safety
//!
//! `Provider` is `Send + Sync` whenever its factory is. Share it by reference
//! or through `Arc`; no global instance exists.
//!
//! ## Fallible Construction
//!
//! Factories with a real error type use [`Provider::try_provide`] and
//! [`Provider::try_provide_delegate`]. A failed construction is returned as a
//! [`ProviderError`] and nothing is cached for it.

mod builder;
mod error;
mod identity;
mod keyed;
mod list;
mod metrics;
mod provider;
mod slot;
mod traits;

pub use builder::ProviderBuilder;
pub use error::ProviderError;
pub use identity::Identity;
pub use keyed::KeyedCache;
pub use list::IdentityList;
pub use metrics::ProviderMetrics;
pub use provider::Provider;
pub use slot::Slot;
pub use traits::{DeviceHandle, WrapperFactory};
