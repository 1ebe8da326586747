//! Declaring a type as singleton-scoped.
//!
//! Implementing [`Singleton`] names the arguments a type is built from and how it is
//! built. Callers then ask for [`Singleton::instance`] instead of constructing the
//! type themselves, and always get the one instance of the current process.
//!
//! ```
//! use process_singleton::Singleton;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! struct Counter {
//!     seed: u32,
//! }
//!
//! impl Singleton for Counter {
//!     type Args = u32;
//!     type Error = Infallible;
//!
//!     fn construct(seed: u32) -> Result<Self, Infallible> {
//!         Ok(Counter { seed })
//!     }
//! }
//!
//! let first = Counter::instance(1).unwrap();
//! let second = Counter::instance(2).unwrap();
//! assert_eq!(second.seed, 1);
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::error::Error;
use std::sync::Arc;

use crate::{global, Registry, RegistryError};

pub trait Singleton: Sized + Send + Sync + 'static {
    /// Arguments the instance is constructed from. Only the first call's arguments are used.
    type Args;

    /// Error returned by a failed construction. Use `Infallible` when construction cannot fail.
    type Error: Into<Box<dyn Error + Send + Sync + 'static>>;

    fn construct(args: Self::Args) -> Result<Self, Self::Error>;

    /// The process-wide instance, constructed from `args` on first use.
    fn instance(args: Self::Args) -> Result<Arc<Self>, RegistryError> {
        Self::instance_in(global::global(), args)
    }

    /// The instance held by `registry`, constructed from `args` on first use.
    fn instance_in(registry: &Registry, args: Self::Args) -> Result<Arc<Self>, RegistryError> {
        registry.get_or_try_create(|| Self::construct(args))
    }

    /// The process-wide instance, if one was already constructed.
    fn existing() -> Result<Arc<Self>, RegistryError> {
        global::get::<Self>()
    }

    /// Drops the process-wide registry's reference to this type's instance.
    fn reset_instance() -> usize {
        global::reset_type::<Self>()
    }
}
