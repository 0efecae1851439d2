use std::fmt;

use uuid::Uuid;

/// Stable identity of an external device, used as the key of both provider caches.
///
/// Two handles referring to the same device must report equal identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(Uuid);

impl Identity {
	/// Wrap a UUID.
	pub const fn new(uuid: Uuid) -> Self {
		Self(uuid)
	}

	/// The wrapped UUID.
	pub const fn uuid(&self) -> Uuid {
		self.0
	}
}

impl From<Uuid> for Identity {
	fn from(uuid: Uuid) -> Self {
		Self(uuid)
	}
}

impl From<Identity> for Uuid {
	fn from(identity: Identity) -> Self {
		identity.0
	}
}

impl fmt::Display for Identity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
