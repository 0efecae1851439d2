/// Tests for sharing a provider across async tasks.
use std::convert::Infallible;
use std::sync::Arc;

use peripheral_provider::{DeviceHandle, Identity, Provider, WrapperFactory};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
struct AsyncHandle(Uuid);

impl DeviceHandle for AsyncHandle {
	fn identity(&self) -> Identity {
		Identity::new(self.0)
	}
}

struct AsyncDelegate;

struct AsyncDevice {
	handle: AsyncHandle,
	delegate: Arc<AsyncDelegate>,
}

struct AsyncFactory;

impl WrapperFactory for AsyncFactory {
	type Handle = AsyncHandle;
	type Manager = ();
	type Delegate = AsyncDelegate;
	type Device = AsyncDevice;
	type Error = Infallible;

	fn create_delegate(&self, _handle: &AsyncHandle) -> Result<AsyncDelegate, Infallible> {
		Ok(AsyncDelegate)
	}

	fn create_device(
		&self,
		_manager: &Arc<()>,
		handle: &AsyncHandle,
		delegate: Arc<AsyncDelegate>,
	) -> Result<AsyncDevice, Infallible> {
		Ok(AsyncDevice {
			handle: handle.clone(),
			delegate,
		})
	}

	fn handle_of(device: &AsyncDevice) -> &AsyncHandle {
		&device.handle
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_provide_across_tasks() {
	let provider = Arc::new(Provider::new(AsyncFactory));
	let manager = Arc::new(());
	let handle = AsyncHandle(Uuid::new_v4());

	let tasks: Vec<_> = (0..32)
		.map(|_| {
			let provider = provider.clone();
			let manager = manager.clone();
			let handle = handle.clone();
			tokio::spawn(async move { provider.provide(&handle, &manager) })
		})
		.collect();

	let mut devices = Vec::new();
	for task in tasks {
		devices.push(task.await.unwrap());
	}

	let cached = provider.provide(&handle, &manager);
	assert!(devices.iter().all(|device| Arc::ptr_eq(device, &cached)));
	assert_eq!(provider.device_count(), 1);
}

#[tokio::test]
async fn test_wrapper_held_across_await() {
	let provider = Arc::new(Provider::new(AsyncFactory));
	let manager = Arc::new(());
	let handle = AsyncHandle(Uuid::new_v4());

	// No lock is held by the returned Arc, so awaiting is fine
	let device = provider.provide(&handle, &manager);
	tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;

	provider.clear_cache();
	tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;

	assert_eq!(device.handle, handle);
	let fresh = provider.provide(&handle, &manager);
	assert!(!Arc::ptr_eq(&device, &fresh));
	assert!(!Arc::ptr_eq(&device.delegate, &fresh.delegate));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_provide_from_blocking_pool() {
	let provider = Arc::new(Provider::new(AsyncFactory));
	let handle = AsyncHandle(Uuid::new_v4());

	let delegate = {
		let provider = provider.clone();
		let handle = handle.clone();
		tokio::task::spawn_blocking(move || provider.provide_delegate(&handle)).await.unwrap()
	};

	let device = provider.provide(&handle, &Arc::new(()));
	assert!(Arc::ptr_eq(&device.delegate, &delegate));
}
