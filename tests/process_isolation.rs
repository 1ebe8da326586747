//! Integration tests for per-process instance spaces.
//!
//! The test binary re-executes itself as child processes. A child sees the
//! `SINGLETON_CHILD_SEED` environment variable, constructs its own instance from that
//! seed and reports it on stdout.

use process_singleton::{get_or_create, reset, ExecutionContextId, RegistryKey};
use serial_test::serial;
use std::collections::HashSet;
use std::env;
use std::process::{self, Command};

const CHILD_SEED: &str = "SINGLETON_CHILD_SEED";
const CHILD_TEST: &str = "test_each_process_constructs_its_own_instance";

#[derive(Debug)]
struct Worker {
    seed: u32,
    pid: u32,
}

fn run_child(seed: u32) -> (u32, u32) {
    let exe = env::current_exe().unwrap();
    let output = Command::new(exe)
        .args([CHILD_TEST, "--exact", "--nocapture", "--test-threads=1", "-q"])
        .env(CHILD_SEED, seed.to_string())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "child failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .find_map(|line| line.strip_prefix("child-worker "))
        .unwrap_or_else(|| panic!("no report in child output: {stdout}"));
    let mut fields = line.split_whitespace().map(|f| f.parse::<u32>().unwrap());
    (fields.next().unwrap(), fields.next().unwrap())
}

#[test]
#[serial]
fn test_each_process_constructs_its_own_instance() {
    if let Ok(seed) = env::var(CHILD_SEED) {
        let seed: u32 = seed.parse().unwrap();
        let worker = get_or_create(|| Worker {
            seed,
            pid: process::id(),
        })
        .unwrap();
        assert_eq!(worker.seed, seed);
        println!("child-worker {} {}", worker.seed, worker.pid);
        return;
    }

    reset();
    let parent = get_or_create(|| Worker {
        seed: 1000,
        pid: process::id(),
    })
    .unwrap();

    let reports: Vec<(u32, u32)> = (0..5).map(run_child).collect();

    let seeds: HashSet<u32> = reports.iter().map(|(seed, _)| *seed).collect();
    assert_eq!(seeds, (0..5).collect::<HashSet<_>>());

    let pids: HashSet<u32> = reports.iter().map(|(_, pid)| *pid).collect();
    assert_eq!(pids.len(), 5);
    assert!(!pids.contains(&parent.pid));

    // Children never touched the parent's instance.
    let again = get_or_create(|| Worker { seed: 0, pid: 0 }).unwrap();
    assert_eq!(again.seed, 1000);
    assert_eq!(again.pid, process::id());
}

#[test]
fn test_key_is_bound_to_current_process() {
    let key = RegistryKey::of::<Worker>();
    assert_eq!(key.context(), ExecutionContextId::current());
    assert_eq!(key.context().as_raw(), process::id());
}
