use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::loader::Snapshot;

/// Writes `snapshot` as gzip-compressed bincode.
pub fn save_snapshot(snapshot: &Snapshot, filename: impl AsRef<Path>) -> Result<()> {
    let file = File::create(filename)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, snapshot)?;

    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?.flush()?;
    Ok(())
}

pub fn load_snapshot(filename: impl AsRef<Path>) -> Result<Snapshot> {
    let file = File::open(filename)?;
    let decoder = GzDecoder::new(file);
    let mut reader = BufReader::new(decoder);

    let snapshot: Snapshot = deserialize_from(&mut reader)?;

    Ok(snapshot)
}
