use std::convert::Infallible;

use thiserror::Error;

use crate::identity::Identity;

/// A wrapper constructor failed. Nothing was cached for the failed construction.
#[derive(Debug, Error)]
pub enum ProviderError<E>
where
	E: std::error::Error + 'static,
{
	/// The delegate wrapper could not be built.
	#[error("failed to create delegate wrapper for device {identity}")]
	Delegate {
		identity: Identity,
		#[source]
		source: E,
	},

	/// The device wrapper could not be built.
	#[error("failed to create device wrapper for device {identity}")]
	Device {
		identity: Identity,
		#[source]
		source: E,
	},
}

impl<E> ProviderError<E>
where
	E: std::error::Error + 'static,
{
	/// Identity of the device whose wrapper failed to build.
	pub fn identity(&self) -> Identity {
		match self {
			ProviderError::Delegate { identity, .. } | ProviderError::Device { identity, .. } => {
				*identity
			}
		}
	}

	/// The factory's error.
	pub fn into_source(self) -> E {
		match self {
			ProviderError::Delegate { source, .. } | ProviderError::Device { source, .. } => source,
		}
	}
}

impl ProviderError<Infallible> {
	pub(crate) fn unreachable(self) -> ! {
		match self.into_source() {}
	}
}
