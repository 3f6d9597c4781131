//! Runtime handles and blocking entry points.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// Used by the `#[core_async::test]` and `#[core_async::main]` macros.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Returns a handle to the runtime driving the current task, if any.
///
/// Destructors use this to schedule async cleanup without assuming they run
/// inside a runtime.
pub fn current_handle() -> Option<Handle> {
    Handle::try_current().ok()
}
