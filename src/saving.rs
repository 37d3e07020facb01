use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

use crate::puzzle::Puzzle;

pub fn save_puzzle(puzzle: &Puzzle, path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(path.as_ref())?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, puzzle)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    writer.flush()?;
    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?;

    info!("saved '{}' to {}", puzzle.title, path.as_ref().display());
    Ok(())
}

pub fn load_puzzle(path: impl AsRef<Path>) -> std::io::Result<Puzzle> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(file);
    let mut reader = BufReader::new(decoder);

    let puzzle: Puzzle = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(puzzle)
}

pub fn to_bytes(puzzle: &Puzzle) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serialize_into(&mut encoder, puzzle)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    encoder.finish()
}

pub fn from_bytes(buffer: &[u8]) -> std::io::Result<Puzzle> {
    let decoder = GzDecoder::new(Cursor::new(buffer));
    let mut reader = BufReader::new(decoder);

    deserialize_from(&mut reader).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
