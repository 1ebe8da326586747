//! The process-wide default registry.
//!
//! Initialized on first use, torn down at process exit, cleared explicitly with
//! [`reset`].
//!
//! ```
//! use process_singleton::{get_or_create, reset};
//! use std::sync::Arc;
//!
//! struct Clock {
//!     started_at: u64,
//! }
//!
//! let a: Arc<Clock> = get_or_create(|| Clock { started_at: 10 }).unwrap();
//! let b: Arc<Clock> = get_or_create(|| Clock { started_at: 99 }).unwrap();
//! assert_eq!(b.started_at, 10);
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! reset();
//! ```

use std::error::Error;
use std::sync::{Arc, LazyLock};

use crate::{Registry, RegistryApi, RegistryConfig, RegistryError, RegistryEvent};

static GLOBAL_REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::with_config(RegistryConfig::new().with_name("global")));

/// [`RegistryApi`] handle for the process-wide registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl RegistryApi for Global {
    fn registry() -> &'static Registry {
        &GLOBAL_REGISTRY
    }
}

/// The process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Returns the process-wide instance of `T`, constructing it with `build` on first use.
///
/// Only the first successful construction takes effect; the arguments captured by
/// later `build` closures are ignored.
pub fn get_or_create<T, F>(build: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> T,
{
    GLOBAL_REGISTRY.get_or_create(build)
}

/// Fallible variant of [`get_or_create`]. A failed construction leaves `T` unregistered.
pub fn get_or_try_create<T, E, F>(build: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    E: Into<Box<dyn Error + Send + Sync + 'static>>,
    F: FnOnce() -> Result<T, E>,
{
    GLOBAL_REGISTRY.get_or_try_create(build)
}

/// Retrieves the existing process-wide instance of `T`.
///
/// ```
/// use process_singleton::{get, RegistryError};
///
/// struct NeverCreated;
///
/// assert!(matches!(get::<NeverCreated>(), Err(RegistryError::TypeNotFound { .. })));
/// ```
pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, RegistryError> {
    GLOBAL_REGISTRY.get()
}

pub fn contains<T: Send + Sync + 'static>() -> bool {
    GLOBAL_REGISTRY.contains::<T>()
}

/// Clears the process-wide registry. Intended for use between test cases.
pub fn reset() -> usize {
    GLOBAL_REGISTRY.reset()
}

/// Clears the process-wide instance of `T` (in every execution context the map has seen).
pub fn reset_type<T: 'static>() -> usize {
    GLOBAL_REGISTRY.reset_type::<T>()
}

/// Sets a tracing callback on the process-wide registry.
///
/// ```rust
/// use process_singleton::{clear_trace_callback, set_trace_callback};
///
/// set_trace_callback(|event| println!("[registry-trace] {event}"));
/// clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    GLOBAL_REGISTRY.set_trace_callback(callback);
}

pub fn clear_trace_callback() {
    GLOBAL_REGISTRY.clear_trace_callback();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct Marker(u8);

    #[test]
    #[serial]
    fn test_free_functions_share_global_registry() {
        reset();

        let created = get_or_create(|| Marker(1)).unwrap();
        let via_api = Global.get::<Marker>().unwrap();
        let via_registry = global().get::<Marker>().unwrap();

        assert_eq!(created.0, 1);
        assert!(Arc::ptr_eq(&created, &via_api));
        assert!(Arc::ptr_eq(&created, &via_registry));
        assert!(contains::<Marker>());

        assert_eq!(reset_type::<Marker>(), 1);
        assert!(!contains::<Marker>());
    }

    #[test]
    #[serial]
    fn test_global_config_name() {
        assert_eq!(global().config().name, "global");
        assert_eq!(global().config().wait_timeout, None);
    }
}
