//! Keyed singleton registry with exactly-once construction.
//!
//! Each logical type gets at most one instance per OS process. Lookups hit a
//! read-locked map; a miss takes the registry's coordination lock, re-checks, and
//! either claims the construction or parks on the thread that already did.
//!
//! # Examples
//!
//! ```
//! use process_singleton::Registry;
//! use std::sync::Arc;
//!
//! struct Counter {
//!     seed: u32,
//! }
//!
//! let registry = Registry::new();
//!
//! let first = registry.get_or_create(|| Counter { seed: 1 }).unwrap();
//! let second = registry.get_or_create(|| Counter { seed: 2 }).unwrap();
//!
//! // Only the first set of arguments wins.
//! assert_eq!(second.seed, 1);
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::construction::{Construction, Handle};
use crate::{ExecutionContextId, RegistryConfig, RegistryError, RegistryEvent, RegistryKey};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It is invoked with no registry lock held, so it may call back
/// into the registry.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Which entries a reset removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Every entry, in every execution context.
    All,
    /// Entries of one logical type, in every execution context.
    Type {
        type_id: TypeId,
        type_name: &'static str,
    },
}

impl ResetScope {
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        ResetScope::Type {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

enum Claim {
    Build(Arc<Construction>),
    Wait(Arc<Construction>),
}

/// Process-scoped singleton storage.
///
/// The registry owns every stored instance; callers receive `Arc<T>` handles to it.
/// Entries live until [`reset`](Registry::reset) / [`reset_type`](Registry::reset_type)
/// or process exit. Handles already given out stay valid after a reset: only the
/// registry's own reference is dropped.
pub struct Registry {
    config: RegistryConfig,
    instances: RwLock<HashMap<RegistryKey, Handle>>,
    // Coordination lock. Always taken before `instances` when both are needed.
    in_flight: Mutex<HashMap<RegistryKey, Arc<Construction>>>,
    trace: RwLock<Option<Arc<TraceCallback>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            instances: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            trace: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// Replaces any previously installed callback.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.trace.write() = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        *self.trace.write() = None;
    }

    fn emit_event(&self, event: RegistryEvent) {
        let callback = self.trace.read().clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------------------------------

    /// Returns the instance of `T` for the calling process, constructing it with `build`
    /// if none exists yet.
    ///
    /// On a hit `build` is dropped without being called: the arguments it captured are
    /// ignored. See [`get_or_try_create`](Registry::get_or_try_create) for the full contract.
    pub fn get_or_create<T, F>(&self, build: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        self.get_or_try_create(|| Ok::<T, Infallible>(build()))
    }

    /// Returns the instance of `T` for the calling process, constructing it with a
    /// fallible `build` if none exists yet.
    ///
    /// Exactly one constructor runs per key no matter how many threads race here. A
    /// caller that finds another thread's construction in flight blocks until it
    /// settles and receives the same handle, or the same error.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ConstructionFailed`]: `build` returned an error. The key stays
    ///   unoccupied so a later call may retry.
    /// - [`RegistryError::ConstructionPanicked`]: the constructing thread panicked.
    /// - [`RegistryError::ReentrantConstruction`]: `build` (or something it called)
    ///   requested `T` again on the same thread. Requesting *other* types from inside a
    ///   constructor is fine.
    /// - [`RegistryError::WaitTimeout`]: a configured wait timeout elapsed.
    pub fn get_or_try_create<T, E, F>(&self, build: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
        F: FnOnce() -> Result<T, E>,
    {
        let key = RegistryKey::of::<T>();

        if let Some(hit) = self.peek(&key) {
            return self.hit(&key, hit);
        }

        let claim = {
            let mut in_flight = self.in_flight.lock();

            // Another thread may have published between the fast path and the lock.
            if let Some(hit) = self.peek(&key) {
                drop(in_flight);
                return self.hit(&key, hit);
            }

            match in_flight.get(&key) {
                Some(pending) if pending.is_owned_by_current_thread() => {
                    warn!(
                        registry = self.config.name,
                        type_name = key.type_name(),
                        "re-entrant singleton construction rejected"
                    );
                    return Err(RegistryError::ReentrantConstruction {
                        type_name: key.type_name(),
                    });
                }
                Some(pending) => Claim::Wait(Arc::clone(pending)),
                None => {
                    let pending = Arc::new(Construction::new());
                    in_flight.insert(key, Arc::clone(&pending));
                    Claim::Build(pending)
                }
            }
        };

        let handle = match claim {
            Claim::Build(pending) => self.construct(key, &pending, build)?,
            Claim::Wait(pending) => self.wait(&key, &pending)?,
        };
        downcast(&key, handle)
    }

    fn construct<T, E, F>(
        &self,
        key: RegistryKey,
        pending: &Construction,
        build: F,
    ) -> Result<Handle, RegistryError>
    where
        T: Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
        F: FnOnce() -> Result<T, E>,
    {
        debug!(
            registry = self.config.name,
            type_name = key.type_name(),
            pid = key.context().as_raw(),
            "constructing singleton"
        );
        // Armed before any user code runs, the trace callback included.
        let guard = PanicGuard {
            registry: self,
            key,
            pending,
            armed: true,
        };
        self.emit_event(RegistryEvent::Construct {
            type_name: key.type_name(),
            context: key.context(),
        });
        let outcome = build();
        guard.disarm();

        match outcome {
            Ok(value) => {
                let handle: Handle = Arc::new(value);
                self.settle(&key, pending, Ok(Arc::clone(&handle)));
                debug!(
                    registry = self.config.name,
                    type_name = key.type_name(),
                    "singleton published"
                );
                Ok(handle)
            }
            Err(source) => {
                let err = RegistryError::construction_failed(key.type_name(), source);
                warn!(
                    registry = self.config.name,
                    type_name = key.type_name(),
                    error = %err,
                    "singleton construction failed"
                );
                self.settle(&key, pending, Err(err.clone()));
                self.emit_event(RegistryEvent::ConstructionFailed {
                    type_name: key.type_name(),
                });
                Err(err)
            }
        }
    }

    fn wait(&self, key: &RegistryKey, pending: &Construction) -> Result<Handle, RegistryError> {
        trace!(
            registry = self.config.name,
            type_name = key.type_name(),
            "waiting on in-flight construction"
        );
        self.emit_event(RegistryEvent::Wait {
            type_name: key.type_name(),
        });

        pending
            .wait(key.type_name(), self.config.wait_timeout)
            .inspect_err(|err| {
                if let RegistryError::WaitTimeout { waited, .. } = err {
                    warn!(
                        registry = self.config.name,
                        type_name = key.type_name(),
                        ?waited,
                        "gave up waiting on singleton construction"
                    );
                }
            })
    }

    /// Publishes (on success) and retires the in-flight record under the coordination lock.
    fn settle(
        &self,
        key: &RegistryKey,
        pending: &Construction,
        outcome: Result<Handle, RegistryError>,
    ) {
        let mut in_flight = self.in_flight.lock();
        if let Ok(handle) = &outcome {
            self.instances.write().insert(*key, Arc::clone(handle));
        }
        in_flight.remove(key);
        pending.settle(outcome);
    }

    fn hit<T: Send + Sync + 'static>(
        &self,
        key: &RegistryKey,
        handle: Handle,
    ) -> Result<Arc<T>, RegistryError> {
        trace!(
            registry = self.config.name,
            type_name = key.type_name(),
            "singleton hit"
        );
        self.emit_event(RegistryEvent::Hit {
            type_name: key.type_name(),
        });
        downcast(key, handle)
    }

    fn peek(&self, key: &RegistryKey) -> Option<Handle> {
        self.instances.read().get(key).cloned()
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Retrieve the existing instance of `T` without constructing one.
    ///
    /// # Errors
    ///
    /// [`RegistryError::TypeNotFound`] if no instance of `T` exists in this process.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let key = RegistryKey::of::<T>();
        let result = match self.peek(&key) {
            Some(handle) => downcast(&key, handle),
            None => Err(RegistryError::TypeNotFound {
                type_name: key.type_name(),
            }),
        };

        self.emit_event(RegistryEvent::Get {
            type_name: key.type_name(),
            found: result.is_ok(),
        });

        result
    }

    /// Check whether an instance of `T` exists in this process.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let key = RegistryKey::of::<T>();
        let found = self.instances.read().contains_key(&key);

        self.emit_event(RegistryEvent::Contains {
            type_name: key.type_name(),
            found,
        });

        found
    }

    /// Number of instances stored for the calling process.
    pub fn len(&self) -> usize {
        let context = ExecutionContextId::current();
        self.instances
            .read()
            .keys()
            .filter(|key| key.context() == context)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------------------------------

    /// Clear every entry, returning how many were removed.
    ///
    /// Primarily meant for isolating test cases. Handles already held by callers are
    /// unaffected, and a construction in flight still publishes when it completes.
    pub fn reset(&self) -> usize {
        self.reset_scope(ResetScope::All)
    }

    /// Clear the entries of `T` in every execution context, returning how many were removed.
    pub fn reset_type<T: 'static>(&self) -> usize {
        self.reset_scope(ResetScope::of::<T>())
    }

    pub fn reset_scope(&self, scope: ResetScope) -> usize {
        // Dropped after both locks are released, so instance destructors may use the registry.
        let removed: Vec<Handle> = {
            let _in_flight = self.in_flight.lock();
            let mut instances = self.instances.write();
            match scope {
                ResetScope::All => instances.drain().map(|(_, handle)| handle).collect(),
                ResetScope::Type { type_id, .. } => {
                    let keys: Vec<RegistryKey> = instances
                        .keys()
                        .filter(|key| key.type_id() == type_id)
                        .copied()
                        .collect();
                    keys.iter().filter_map(|key| instances.remove(key)).collect()
                }
            }
        };

        let count = removed.len();
        debug!(registry = self.config.name, removed = count, ?scope, "registry reset");

        let event = match scope {
            ResetScope::All => RegistryEvent::Reset { removed: count },
            ResetScope::Type { type_name, .. } => RegistryEvent::ResetType {
                type_name,
                removed: count,
            },
        };
        drop(removed);
        self.emit_event(event);

        count
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Separate statements: each guard is released before the next lock is taken.
        let entries = self.instances.read().len();
        let in_flight = self.in_flight.lock().len();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("entries", &entries)
            .field("in_flight", &in_flight)
            .finish_non_exhaustive()
    }
}

fn downcast<T: Send + Sync + 'static>(
    key: &RegistryKey,
    handle: Handle,
) -> Result<Arc<T>, RegistryError> {
    handle
        .downcast::<T>()
        .map_err(|_| RegistryError::TypeMismatch {
            type_name: key.type_name(),
        })
}

/// Retires the in-flight record if the constructor or the `Construct` trace callback
/// unwinds, so waiters are released and the key can be retried.
struct PanicGuard<'a> {
    registry: &'a Registry,
    key: RegistryKey,
    pending: &'a Construction,
    armed: bool,
}

impl PanicGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            registry = self.registry.config.name,
            type_name = self.key.type_name(),
            "singleton constructor panicked"
        );
        self.registry.settle(
            &self.key,
            self.pending,
            Err(RegistryError::ConstructionPanicked {
                type_name: self.key.type_name(),
            }),
        );
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
