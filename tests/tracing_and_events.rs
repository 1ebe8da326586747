//! Integration tests for tracing and event monitoring.
//!
//! Covers the user trace callback and the `tracing` log output of a registry.

use process_singleton::{define_registry, Registry, RegistryConfig, RegistryEvent};
use std::io;
use std::sync::{Arc, Mutex};

fn collect_events(registry: &Registry) -> Arc<Mutex<Vec<RegistryEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.clone());
    });
    events
}

#[test]
fn test_construct_then_hit() {
    let registry = Registry::new();
    let events = collect_events(&registry);

    registry.get_or_create(|| 42i32).unwrap();
    registry.get_or_create(|| 43i32).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        [
            RegistryEvent::Construct {
                type_name: "i32",
                context: process_singleton::ExecutionContextId::current(),
            },
            RegistryEvent::Hit { type_name: "i32" },
        ]
    );
}

#[test]
fn test_failed_construction_event() {
    let registry = Registry::new();
    let events = collect_events(&registry);

    let _ = registry.get_or_try_create(|| Err::<u64, _>(io::Error::other("nope")));

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(
        captured[1],
        RegistryEvent::ConstructionFailed { type_name: "u64" }
    );
}

#[test]
fn test_get_found_and_not_found() {
    let registry = Registry::new();
    registry.get_or_create(|| 123i64).unwrap();
    let events = collect_events(&registry);

    let _ = registry.get::<i64>();
    let _ = registry.get::<f32>();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        [
            RegistryEvent::Get {
                type_name: "i64",
                found: true
            },
            RegistryEvent::Get {
                type_name: "f32",
                found: false
            },
        ]
    );
}

#[test]
fn test_reset_events() {
    let registry = Registry::new();
    registry.get_or_create(|| 1u8).unwrap();
    registry.get_or_create(|| 1u16).unwrap();
    let events = collect_events(&registry);

    registry.reset_type::<u8>();
    registry.reset();

    let captured: Vec<String> = events.lock().unwrap().iter().map(|e| e.to_string()).collect();
    assert_eq!(
        captured,
        [
            "reset type { type_name: u8, removed: 1 }",
            "reset { removed: 1 }",
        ]
    );
}

#[test]
fn test_clear_trace_callback() {
    define_registry!(traced);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    traced::set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });
    let _ = traced::contains::<String>();

    traced::clear_trace_callback();
    traced::get_or_create(|| "quiet".to_string()).unwrap();
    let _ = traced::contains::<String>();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0],
        "contains { type_name: alloc::string::String, found: false }"
    );
}

#[test]
fn test_replacing_callback() {
    let registry = Registry::new();
    let first = collect_events(&registry);
    let second = collect_events(&registry);

    registry.get_or_create(|| 'x').unwrap();

    assert!(first.lock().unwrap().is_empty());
    assert_eq!(second.lock().unwrap().len(), 1);
}

#[test]
fn test_tracing_subscriber_sees_registry_logs() {
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("process_singleton=debug"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let registry = Registry::with_config(RegistryConfig::new().with_name("logged"));
        registry.get_or_create(|| 5u32).unwrap();
        registry.reset();
    });

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("constructing singleton"));
    assert!(output.contains("singleton published"));
    assert!(output.contains("registry reset"));
    assert!(output.contains("logged"));
}
