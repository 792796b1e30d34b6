//! Saving and loading registry snapshots.

pub mod codec;

pub use codec::{decode, encode, LoadReport};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::OrphanPolicy;
use crate::error::Result;
use crate::registry::Registry;

/// Write the registry to `path`, replacing any existing file.
///
/// Names are checked before the file is opened, so an unsaveable registry
/// leaves the previous file untouched.
pub fn save_system_state(registry: &Registry, path: &Path) -> Result<()> {
    codec::check_encodable(registry)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    codec::encode(registry, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} students, {} clubs to {}",
        registry.store().student_count(),
        registry.store().club_count(),
        path.display()
    );
    Ok(())
}

/// Parse the snapshot at `path` into a new registry.
pub fn read_system_state(
    path: &Path,
    max_clubs: usize,
    orphans: OrphanPolicy,
) -> Result<(Registry, LoadReport)> {
    let reader = BufReader::new(File::open(path)?);
    codec::decode(reader, max_clubs, orphans)
}

/// Replace `registry` with the snapshot at `path`.
///
/// The file is parsed in full before anything is swapped in; on error the
/// current registry is unchanged.
pub fn load_system_state(
    registry: &mut Registry,
    path: &Path,
    orphans: OrphanPolicy,
) -> Result<LoadReport> {
    let (loaded, report) = read_system_state(path, registry.store().max_clubs(), orphans)?;
    registry.replace(loaded);

    tracing::info!("Loaded {} from {}", report, path.display());
    Ok(report)
}
