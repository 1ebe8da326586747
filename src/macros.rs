//! Macros for creating isolated singleton registries.

/// Creates an isolated singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily initialized [`Registry`](crate::Registry) static (hidden)
/// - An `Api` struct that implements [`RegistryApi`](crate::RegistryApi), and an `API` constant
/// - Free functions delegating to it
///
/// Each generated registry has its own instance space: the same type can have one
/// instance in `database` and a different one in `cache`.
///
/// # Examples
///
/// ```rust
/// use process_singleton::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// struct Mailer {
///     host: String,
/// }
///
/// let mailer: Arc<Mailer> = services::get_or_create(|| Mailer { host: "smtp-a".into() }).unwrap();
/// let again: Arc<Mailer> = services::get_or_create(|| Mailer { host: "smtp-b".into() }).unwrap();
///
/// assert_eq!(again.host, "smtp-a");
/// assert!(Arc::ptr_eq(&mailer, &again));
/// ```
///
/// # Configuration
///
/// A second argument supplies the [`RegistryConfig`](crate::RegistryConfig). It is
/// evaluated inside the generated module, with the parent module's imports in scope.
///
/// ```rust
/// use process_singleton::{define_registry, RegistryConfig};
/// use std::time::Duration;
///
/// define_registry!(
///     plugins,
///     RegistryConfig::new()
///         .with_name("plugins")
///         .with_wait_timeout(Duration::from_secs(2))
/// );
///
/// # fn main() {
/// assert_eq!(plugins::registry().config().name, "plugins");
/// # }
/// ```
///
/// # Trait-Based Usage
///
/// ```rust
/// use process_singleton::{define_registry, RegistryApi};
/// use std::sync::Arc;
///
/// define_registry!(app);
///
/// let value: Arc<i32> = app::API.get_or_create(|| 100).unwrap();
/// assert_eq!(*value, 100);
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        $crate::define_registry!($name, $crate::RegistryConfig::new().with_name(stringify!($name)));
    };
    ($name:ident, $config:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<$crate::Registry> =
                LazyLock::new(|| $crate::Registry::with_config($config));

            /// Zero-sized handle implementing the registry API.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn registry() -> &'static $crate::Registry {
                    &REGISTRY
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// The backing registry.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            /// Return the instance of `T`, constructing it with `build` on first use.
            pub fn get_or_create<T, F>(build: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> T,
            {
                REGISTRY.get_or_create(build)
            }

            /// Fallible variant of `get_or_create`.
            pub fn get_or_try_create<T, E, F>(build: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
                F: FnOnce() -> Result<T, E>,
            {
                REGISTRY.get_or_try_create(build)
            }

            /// Retrieve the existing instance of `T`.
            pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get()
            }

            /// Check if an instance of `T` exists.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                REGISTRY.contains::<T>()
            }

            /// Clear every entry.
            pub fn reset() -> usize {
                REGISTRY.reset()
            }

            /// Clear the entries of `T`.
            pub fn reset_type<T: 'static>() -> usize {
                REGISTRY.reset_type::<T>()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
