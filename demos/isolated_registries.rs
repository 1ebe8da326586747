//! Isolated registries example for process-singleton.
//!
//! Demonstrates:
//! - Named registries generated with `define_registry!`
//! - Configuring a bounded wait for callers blocked on another thread's construction
//! - Per-type reset
//!
//! Run with: `cargo run --example isolated_registries`

use process_singleton::{define_registry, RegistryConfig, RegistryError};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

define_registry!(cache);
define_registry!(
    plugins,
    RegistryConfig::new()
        .with_name("plugins")
        .with_wait_timeout(Duration::from_millis(50))
);

#[derive(Debug)]
struct Connection {
    url: &'static str,
}

#[derive(Debug)]
struct PluginHost {
    loaded: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== process-singleton: Isolated Registries ===\n");

    // -------------------------------------------------------------------------
    // 1. Same type, separate registries
    // -------------------------------------------------------------------------
    println!("1. One Connection per registry...");
    let in_cache = cache::get_or_create(|| Connection { url: "redis://cache" }).unwrap();
    let in_plugins = plugins::get_or_create(|| Connection { url: "grpc://plugins" }).unwrap();
    println!("   cache:   {}", in_cache.url);
    println!("   plugins: {}", in_plugins.url);

    // -------------------------------------------------------------------------
    // 2. Bounded wait
    // -------------------------------------------------------------------------
    println!("\n2. Waiting on a slow PluginHost construction (50ms limit)...");
    let (started_tx, started_rx) = mpsc::channel();
    let builder = thread::spawn(move || {
        plugins::get_or_create(|| {
            started_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(200));
            PluginHost { loaded: 12 }
        })
    });
    started_rx.recv().unwrap();

    match plugins::get_or_create(|| PluginHost { loaded: 0 }) {
        Err(err @ RegistryError::WaitTimeout { .. }) => println!("   gave up: {err}"),
        other => println!("   unexpected: {other:?}"),
    }
    let host = builder.join().unwrap().unwrap();
    println!("   builder finished: {} plugins loaded", host.loaded);

    // -------------------------------------------------------------------------
    // 3. Per-type reset
    // -------------------------------------------------------------------------
    println!("\n3. Resetting Connection in plugins only...");
    println!("   removed: {}", plugins::reset_type::<Connection>());
    println!("   plugins has Connection: {}", plugins::contains::<Connection>());
    println!("   plugins has PluginHost: {}", plugins::contains::<PluginHost>());
    println!("   cache has Connection:   {}", cache::contains::<Connection>());

    println!("\n=== Done ===");
}
