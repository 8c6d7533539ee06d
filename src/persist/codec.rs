//! Binary network format.
//!
//! All numbers are little-endian:
//!
//! ```text
//! magic       b"ANET"
//! version     u32
//! dirty       u8
//! activation  u8          0 = disabled, 1 = enabled
//! epsilon     f64
//! step        f64
//! arena       u64         arena size in bytes
//! inputs      u64         input width
//! layers      u64         layer count, then one u64 width per layer
//! rows        u64         dataset rows
//! payload     f64 × arena / 8
//! ```
//!
//! Only sizes are stored; every offset is re-derived through
//! [`Layout::from_config`] when decoding.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, warn};

use crate::activation::ActivationMode;
use crate::arena::Layout;
use crate::error::{NetError, Result};
use crate::network::network::Network;

pub const MAGIC: &[u8; 4] = b"ANET";
pub const VERSION: u32 = 1;

/// Caps the up-front reservation for the width list so a corrupt layer count
/// cannot trigger a huge allocation before the file runs out.
const MAX_PREALLOCATED_LAYERS: usize = 1024;

impl Network {
    /// Writes the network in the binary network format.
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(VERSION)?;
        writer.write_u8(self.dirty as u8)?;
        writer.write_u8(self.activation.to_byte())?;
        writer.write_f64::<LittleEndian>(self.epsilon)?;
        writer.write_f64::<LittleEndian>(self.learning_step)?;

        writer.write_u64::<LittleEndian>(self.layout.bytes() as u64)?;
        writer.write_u64::<LittleEndian>(self.layout.input_width() as u64)?;
        writer.write_u64::<LittleEndian>(self.layer_count() as u64)?;
        for width in self.layout.widths() {
            writer.write_u64::<LittleEndian>(width as u64)?;
        }
        writer.write_u64::<LittleEndian>(self.layout.rows() as u64)?;

        for &value in &self.arena {
            writer.write_f64::<LittleEndian>(value)?;
        }
        Ok(())
    }

    /// Reads a network written by [`Network::encode`] into a fresh arena.
    ///
    /// The header is validated and the layout re-derived before the payload
    /// is read; a short payload fails with an `UnexpectedEof` I/O error. The
    /// decoded network is clean.
    pub fn decode<R: Read>(reader: &mut R) -> Result<Network> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(invalid("bad magic bytes"));
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != VERSION {
            warn!(version, "unsupported network file version");
            return Err(NetError::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let _dirty = reader.read_u8()?;
        let activation = ActivationMode::from_byte(reader.read_u8()?)
            .ok_or_else(|| invalid("unknown activation mode"))?;
        let epsilon = reader.read_f64::<LittleEndian>()?;
        let step = reader.read_f64::<LittleEndian>()?;
        if !(epsilon > 0.0) || !(step > 0.0) {
            return Err(invalid("epsilon and learning step must be positive"));
        }

        let arena_bytes = read_size(reader)?;
        let input_width = read_size(reader)?;
        let layer_count = read_size(reader)?;
        if layer_count == 0 {
            return Err(invalid("network has no layers"));
        }
        let mut config = Vec::with_capacity(layer_count.min(MAX_PREALLOCATED_LAYERS) + 1);
        config.push(input_width);
        for _ in 0..layer_count {
            config.push(read_size(reader)?);
        }
        let rows = read_size(reader)?;

        let layout = Layout::from_config(&config, rows).map_err(|err| match err {
            NetError::LayoutOverflow => err,
            other => invalid(&other.to_string()),
        })?;
        if layout.bytes() != arena_bytes {
            return Err(invalid(&format!(
                "stored arena size {arena_bytes} does not match derived size {}",
                layout.bytes()
            )));
        }

        let mut arena = layout.allocate()?;
        reader.read_f64_into::<LittleEndian>(&mut arena)?;

        debug!(?config, rows, bytes = arena_bytes, "decoded network");
        Ok(Network::from_parts(layout, arena, activation, epsilon, step))
    }
}

fn read_size<R: Read>(reader: &mut R) -> Result<usize> {
    let value = reader.read_u64::<LittleEndian>()?;
    usize::try_from(value).map_err(|_| invalid("size field does not fit in memory"))
}

fn invalid(reason: &str) -> NetError {
    warn!(reason, "invalid network file");
    NetError::InvalidFormat(reason.to_string())
}
