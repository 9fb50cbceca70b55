//! Scans the paths of a JSON fixture with a session cursor.
//!
//! The fixture lists the properties of a table and the events of each
//! object. Every object is encoded into a path, then one cursor is bound to
//! each path in turn and its sessions and events are counted.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sky_cursor::CursorConfig;

pub mod fixture;
pub mod scan;

pub use fixture::Fixture;
pub use scan::{scan, ObjectSummary, ScanReport};

/// The idle threshold of the fixture wins over the one from the environment.
pub fn resolve_config(fixture: &Fixture, env: CursorConfig) -> CursorConfig {
    match fixture.session_idle_secs {
        Some(secs) => CursorConfig {
            session_idle_secs: Some(secs),
        },
        None => env,
    }
}

/// Encodes and scans a fixture, decoding every property it declares.
pub fn run_fixture(fixture: &Fixture, config: &CursorConfig) -> Result<ScanReport> {
    let store = fixture.build_store()?;
    let descriptor = fixture
        .properties
        .descriptor_for(&fixture.property_names())
        .context("failed to build descriptor")?;
    Ok(scan(&store, Arc::new(descriptor), config))
}

/// Loads the fixture at `path` and scans it.
pub fn run<P: AsRef<Path>>(path: P) -> Result<ScanReport> {
    let fixture = Fixture::load(path)?;
    let env = CursorConfig::from_env().context("failed to read cursor config")?;
    let config = resolve_config(&fixture, env);
    log::debug!("session idle threshold: {:?}", config.session_idle_secs);
    run_fixture(&fixture, &config)
}
