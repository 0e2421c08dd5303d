//! Run record persistence
//!
//! Records are written either as pretty JSON or as bincode behind an
//! eight-byte header (little-endian version, then magic bytes). Loading
//! sniffs the header and falls back to JSON when the magic is absent.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::state::{RunRecord, RECORD_VERSION};
use crate::error::CheckpointError;
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;

const MAGIC: &[u8; 4] = b"CIEV";
const HEADER_LEN: usize = 8;

/// Format for record serialization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckpointFormat {
    /// JSON format (human-readable, larger)
    Json,
    /// Binary format (compact, fast)
    #[default]
    Binary,
}

impl CheckpointFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "ciev",
        }
    }
}

/// Save a run record to a file
pub fn save_record<G, F>(
    record: &RunRecord<G, F>,
    path: impl AsRef<Path>,
    format: CheckpointFormat,
) -> Result<(), CheckpointError>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    match format {
        CheckpointFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, record)
                .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        }
        CheckpointFormat::Binary => {
            writer.write_all(&RECORD_VERSION.to_le_bytes())?;
            writer.write_all(MAGIC)?;
            bincode::serialize_into(&mut writer, record)
                .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Load a run record from a file written by [`save_record`]
pub fn load_record<G, F>(path: impl AsRef<Path>) -> Result<RunRecord<G, F>, CheckpointError>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(CheckpointError::NotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(CheckpointError::Corrupted(format!(
            "{} is empty",
            path.display()
        )));
    }

    let record: RunRecord<G, F> = if bytes.len() >= HEADER_LEN && &bytes[4..HEADER_LEN] == MAGIC {
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version > RECORD_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: RECORD_VERSION,
                found: version,
            });
        }
        bincode::deserialize(&bytes[HEADER_LEN..])
            .map_err(|e| CheckpointError::Deserialization(e.to_string()))?
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|e| CheckpointError::Deserialization(e.to_string()))?
    };

    if !record.is_compatible() {
        return Err(CheckpointError::VersionMismatch {
            expected: RECORD_VERSION,
            found: record.version,
        });
    }
    Ok(record)
}
