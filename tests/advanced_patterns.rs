//! Integration tests for advanced usage patterns.
//!
//! Real-world shapes singleton-scoped types take in applications: configuration
//! loaded once, services built from other services, shared mutable state.
//!
//! NOTE: All tests use #[serial] because they share the same registry (advanced).

use process_singleton::{define_registry, RegistryError};
use serial_test::serial;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

define_registry!(advanced);

#[test]
#[serial]
fn test_configuration_pattern() {
    advanced::reset();

    #[derive(Clone, Debug, PartialEq)]
    struct AppConfig {
        database_url: String,
        max_connections: u32,
    }

    fn load(overrides: &[(&str, &str)]) -> Result<AppConfig, String> {
        let map: HashMap<_, _> = overrides.iter().copied().collect();
        let max_connections = map
            .get("max_connections")
            .unwrap_or(&"10")
            .parse::<u32>()
            .map_err(|e| format!("max_connections: {e}"))?;
        Ok(AppConfig {
            database_url: map.get("database_url").unwrap_or(&"sqlite::memory:").to_string(),
            max_connections,
        })
    }

    let bad = advanced::get_or_try_create(|| load(&[("max_connections", "many")]));
    assert!(matches!(bad, Err(RegistryError::ConstructionFailed { .. })));

    let config = advanced::get_or_try_create(|| load(&[("max_connections", "100")])).unwrap();
    assert_eq!(config.max_connections, 100);
    assert_eq!(config.database_url, "sqlite::memory:");

    // Anywhere else in the app: same config, overrides ignored.
    let elsewhere = advanced::get_or_try_create(|| load(&[("max_connections", "1")])).unwrap();
    assert_eq!(*elsewhere, *config);
}

#[test]
#[serial]
fn test_service_graph_pattern() {
    advanced::reset();

    struct Database {
        url: String,
    }

    struct UserService {
        db: Arc<Database>,
    }

    struct BillingService {
        db: Arc<Database>,
        users: Arc<UserService>,
    }

    fn database() -> Result<Arc<Database>, RegistryError> {
        advanced::get_or_create(|| Database {
            url: "postgres://localhost".to_string(),
        })
    }

    fn users() -> Result<Arc<UserService>, RegistryError> {
        advanced::get_or_try_create(|| Ok::<_, RegistryError>(UserService { db: database()? }))
    }

    let billing = advanced::get_or_try_create(|| {
        Ok::<_, RegistryError>(BillingService {
            db: database()?,
            users: users()?,
        })
    })
    .unwrap();

    assert!(Arc::ptr_eq(&billing.db, &billing.users.db));
    assert_eq!(billing.db.url, "postgres://localhost");
}

#[test]
#[serial]
fn test_shared_state_pattern() {
    advanced::reset();

    #[derive(Default)]
    struct Metrics {
        requests: AtomicU32,
        paths: Mutex<Vec<String>>,
    }

    thread::scope(|s| {
        for i in 0..8 {
            s.spawn(move || {
                let metrics = advanced::get_or_create(Metrics::default).unwrap();
                metrics.requests.fetch_add(1, Ordering::SeqCst);
                metrics.paths.lock().unwrap().push(format!("/item/{i}"));
            });
        }
    });

    let metrics = advanced::get::<Metrics>().unwrap();
    assert_eq!(metrics.requests.load(Ordering::SeqCst), 8);
    assert_eq!(metrics.paths.lock().unwrap().len(), 8);
}

#[test]
#[serial]
fn test_trait_object_pattern() {
    advanced::reset();

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    // Store the trait object behind a concrete wrapper type.
    struct AppClock(Box<dyn Clock>);

    let clock = advanced::get_or_create(|| AppClock(Box::new(FixedClock(1_700_000_000)))).unwrap();
    assert_eq!(clock.0.now(), 1_700_000_000);
}
