use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::network::network::Network;

/// What [`Network::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The network was written and is now clean.
    Written,
    /// The network had no unsaved changes; the file was not touched.
    Unchanged,
}

impl Network {
    /// Writes the network to `path` if it changed since the last save or load.
    ///
    /// On failure the dirty flag stays set so a later save retries the write.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<SaveOutcome> {
        let path = path.as_ref();
        if !self.dirty {
            info!(path = %path.display(), "network unchanged since last save; not writing");
            return Ok(SaveOutcome::Unchanged);
        }

        self.write_file(path).inspect_err(|err| {
            warn!(path = %path.display(), %err, "failed to save network");
        })?;

        self.dirty = false;
        info!(path = %path.display(), bytes = self.arena_bytes(), "saved network");
        Ok(SaveOutcome::Written)
    }

    fn write_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.encode(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a network previously written by [`Network::save`].
    ///
    /// Always returns a freshly allocated, clean network; nothing is returned
    /// unless the whole file decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let network = File::open(path)
            .map_err(Into::into)
            .and_then(|file| Network::decode(&mut BufReader::new(file)))
            .inspect_err(|err| {
                warn!(path = %path.display(), %err, "failed to load network");
            })?;

        info!(path = %path.display(), bytes = network.arena_bytes(), "loaded network");
        Ok(network)
    }
}
