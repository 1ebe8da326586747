//! Singleton-scoped types example for process-singleton.
//!
//! Demonstrates:
//! - Declaring types singleton-scoped with the `Singleton` trait
//! - Fallible construction and retrying after a failure
//! - Singletons built from other singletons
//! - One generic template applied to distinct types without collisions
//!
//! Run with: `cargo run --example singleton_types`

use process_singleton::{RegistryError, Singleton};
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Settings {
    endpoint: String,
    retries: u8,
}

#[derive(Debug)]
struct MissingEndpoint;

impl fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("endpoint must be set")
    }
}

impl std::error::Error for MissingEndpoint {}

impl Singleton for Settings {
    type Args = (Option<&'static str>, u8);
    type Error = MissingEndpoint;

    fn construct((endpoint, retries): Self::Args) -> Result<Self, MissingEndpoint> {
        Ok(Settings {
            endpoint: endpoint.ok_or(MissingEndpoint)?.to_string(),
            retries,
        })
    }
}

struct ApiClient {
    settings: Arc<Settings>,
}

impl Singleton for ApiClient {
    type Args = ();
    type Error = RegistryError;

    fn construct(_: ()) -> Result<Self, RegistryError> {
        Ok(ApiClient {
            settings: Settings::instance((Some("https://fallback.example.com"), 1))?,
        })
    }
}

/// A reusable pool template. Each `Kind` gets its own singleton.
struct Pool<Kind> {
    size: usize,
    _kind: PhantomData<Kind>,
}

impl<Kind: Send + Sync + 'static> Singleton for Pool<Kind> {
    type Args = usize;
    type Error = Infallible;

    fn construct(size: usize) -> Result<Self, Infallible> {
        Ok(Pool {
            size,
            _kind: PhantomData,
        })
    }
}

struct ReadPool;
struct WritePool;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== process-singleton: Singleton Types ===\n");

    // -------------------------------------------------------------------------
    // 1. Failed construction leaves the slot free
    // -------------------------------------------------------------------------
    println!("1. Constructing Settings without an endpoint...");
    match Settings::instance((None, 3)) {
        Ok(_) => println!("   unexpected success"),
        Err(err) => println!("   error: {err}"),
    }

    let settings = Settings::instance((Some("https://api.example.com"), 3)).unwrap();
    println!("   retry succeeded: {settings:?}");

    // -------------------------------------------------------------------------
    // 2. Dependencies
    // -------------------------------------------------------------------------
    println!("\n2. Building ApiClient on top of Settings...");
    let client = ApiClient::instance(()).unwrap();
    println!(
        "   client endpoint: {} (retries: {})",
        client.settings.endpoint, client.settings.retries
    );
    println!(
        "   shares the Settings instance: {}",
        Arc::ptr_eq(&client.settings, &settings)
    );

    // -------------------------------------------------------------------------
    // 3. One template, two singletons
    // -------------------------------------------------------------------------
    println!("\n3. Pool<ReadPool> and Pool<WritePool>...");
    let reads = Pool::<ReadPool>::instance(16).unwrap();
    let writes = Pool::<WritePool>::instance(2).unwrap();
    println!("   read pool size: {}, write pool size: {}", reads.size, writes.size);

    println!("\n=== Done ===");
}
