//! Core trait giving static registries a uniform API.
//!
//! An implementor only supplies [`RegistryApi::registry`]; every operation has a
//! default implementation delegating to that [`Registry`]. Both the process-wide
//! [`Global`](crate::Global) registry and every module generated by
//! [`define_registry!`](crate::define_registry) implement it.

use std::error::Error;
use std::sync::Arc;

use crate::{Registry, RegistryError, RegistryEvent, ResetScope};

pub trait RegistryApi {
    /// Access the backing registry.
    fn registry() -> &'static Registry;

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked with no registry lock held, so it may query the registry.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        Self::registry().set_trace_callback(callback);
    }

    /// Clear the tracing callback.
    fn clear_trace_callback(&self) {
        Self::registry().clear_trace_callback();
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Return the instance of `T`, constructing it with `build` on first use.
    ///
    /// Later calls return the same instance and never run their `build`.
    fn get_or_create<T, F>(&self, build: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        Self::registry().get_or_create(build)
    }

    /// Fallible variant of [`get_or_create`](RegistryApi::get_or_create).
    ///
    /// # Errors
    ///
    /// See [`Registry::get_or_try_create`].
    fn get_or_try_create<T, E, F>(&self, build: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
        F: FnOnce() -> Result<T, E>,
    {
        Self::registry().get_or_try_create(build)
    }

    /// Retrieve the existing instance of `T` without constructing one.
    fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        Self::registry().get()
    }

    /// Check if an instance of `T` exists.
    fn contains<T: Send + Sync + 'static>(&self) -> bool {
        Self::registry().contains::<T>()
    }

    /// Clear all entries. Intended for isolating tests.
    ///
    /// Already-retrieved `Arc<T>` handles remain valid.
    fn reset(&self) -> usize {
        Self::registry().reset()
    }

    /// Clear the entries of `T` only.
    fn reset_type<T: 'static>(&self) -> usize {
        Self::registry().reset_scope(ResetScope::of::<T>())
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
