//! Basic usage example for process-singleton.
//!
//! Demonstrates:
//! - Getting the process-wide instance with `get_or_create()` (returns `Arc<T>`)
//! - First-writer-wins: later arguments are ignored
//! - Racing threads sharing one construction
//! - Clearing the registry with `reset()`
//!
//! Run with: `RUST_LOG=process_singleton=debug cargo run --example basic_usage`

use process_singleton::{contains, get, get_or_create, reset, set_trace_callback};
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Counter {
    seed: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== process-singleton: Basic Usage ===\n");

    set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. First writer wins
    // -------------------------------------------------------------------------
    println!("1. Requesting Counter twice with different seeds...");

    let first: Arc<Counter> = get_or_create(|| Counter { seed: 1 }).unwrap();
    let second: Arc<Counter> = get_or_create(|| Counter { seed: 2 }).unwrap();

    println!("   first.seed = {}, second.seed = {}", first.seed, second.seed);
    println!("   same instance: {}", Arc::ptr_eq(&first, &second));

    // -------------------------------------------------------------------------
    // 2. Racing threads
    // -------------------------------------------------------------------------
    println!("\n2. Resetting, then racing 5 threads...");
    reset();

    let results: Vec<Arc<Counter>> = thread::scope(|s| {
        let handles: Vec<_> = (0..5)
            .map(|seed| s.spawn(move || get_or_create(|| Counter { seed }).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winner = &results[0];
    println!("   winning seed: {}", winner.seed);
    println!(
        "   all threads share it: {}",
        results.iter().all(|r| Arc::ptr_eq(r, winner))
    );

    // -------------------------------------------------------------------------
    // 3. Lookups
    // -------------------------------------------------------------------------
    println!("\n3. Looking up without constructing...");

    println!("   contains::<Counter>() = {}", contains::<Counter>());
    println!("   get::<String>() = {:?}", get::<String>().map(|s| s.len()));

    println!("\n=== Done ===");
}
