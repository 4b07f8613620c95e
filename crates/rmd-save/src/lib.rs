//! rmd-save: Save/restore system for the RMDVC engine
//!
//! A save file is a versioned header plus the full engine state as JSON,
//! optionally gzip-compressed. Loading sniffs the compression, so both
//! forms share one path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rmd_core::Engine;

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

/// First two bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found: {0}")]
    NotFound(String),

    #[error("Save file corrupted: {0}")]
    Corrupted(String),

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,
}

/// Save file header for versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// Player name
    pub player_name: String,
    /// Turn count at save time
    pub turns: u64,
    /// Local save time, yyyymmddhhmmss
    pub timestamp: String,
}

impl SaveHeader {
    const MAGIC: &'static str = "RMDV";

    pub fn new(engine: &Engine) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            player_name: engine.player_name(),
            turns: engine.turns,
            timestamp: yyyymmddhhmmss(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Format the current local time as yyyymmddhhmmss, which also sorts
/// chronologically as a plain string.
fn yyyymmddhhmmss() -> String {
    let now = Local::now();
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Complete save file structure
#[derive(Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub engine: Engine,
}

/// Save engine state to a file as pretty JSON
pub fn save_game(engine: &Engine, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let json = serde_json::to_string(engine)?;
    let save_file = SaveFile {
        header: SaveHeader::new(engine),
        engine: serde_json::from_str(&json)?,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &save_file)?;
    Ok(())
}

/// Save engine state to a gzip-compressed file
pub fn save_game_compressed(engine: &Engine, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let json = serde_json::to_string(engine)?;
    let save_file = SaveFile {
        header: SaveHeader::new(engine),
        engine: serde_json::from_str(&json)?,
    };
    let bytes = serde_json::to_vec(&save_file)?;

    let file = File::create(path)?;
    let mut encoder =
        flate2::write::GzEncoder::new(BufWriter::new(file), flate2::Compression::default());
    encoder.write_all(&bytes)?;
    encoder.finish()?;
    Ok(())
}

fn read_save_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, SaveError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|_| SaveError::NotFound(path.display().to_string()))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = flate2::read::GzDecoder::new(&bytes[..]);
        let mut decoded = Vec::new();
        decoder
            .read_to_end(&mut decoded)
            .map_err(|e| SaveError::Corrupted(e.to_string()))?;
        return Ok(decoded);
    }
    Ok(bytes)
}

/// Load engine state from a file, compressed or not
pub fn load_game(path: impl AsRef<Path>) -> Result<Engine, SaveError> {
    let bytes = read_save_bytes(path)?;
    let save_file: SaveFile = serde_json::from_slice(&bytes)?;
    save_file.header.validate()?;
    Ok(save_file.engine)
}

/// Load only the header from a save file (for save browsers)
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let bytes = read_save_bytes(path)?;
    let save_file: SaveFile = serde_json::from_slice(&bytes)?;
    save_file.header.validate()?;
    Ok(save_file.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

/// Get the default save path for a player name
pub fn default_save_path(player_name: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("rmdvc");
    std::fs::create_dir_all(&path).ok();
    path.push(format!("{player_name}.sav"));
    path
}

/// List all save files in the default save directory, newest first
pub fn list_saves() -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    let mut dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("rmdvc");

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "sav") {
            if let Ok(header) = load_header(&path) {
                saves.push((path, header));
            }
        }
    }

    saves.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmd_core::body::Body;

    fn test_engine() -> Engine {
        let body = Body::default_humanoid().unwrap();
        Engine::new_game(7, "Saver", body)
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("rmdvc_test_save.sav");

        let engine = test_engine();
        save_game(&engine, &path).unwrap();
        assert!(save_exists(&path));

        let loaded = load_game(&path).unwrap();
        assert_eq!(loaded.turns, engine.turns);
        assert_eq!(loaded.player_name(), "Saver");
        assert_eq!(
            loaded.player().map(|a| a.pos),
            engine.player().map(|a| a.pos)
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_compressed_save_roundtrip() {
        let path = std::env::temp_dir().join("rmdvc_test_save_gz.sav");

        let engine = test_engine();
        save_game_compressed(&engine, &path).unwrap();

        // The file starts with the gzip magic, not JSON.
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &GZIP_MAGIC);

        let loaded = load_game(&path).unwrap();
        assert_eq!(loaded.player_name(), "Saver");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_validation() {
        let engine = test_engine();
        let header = SaveHeader::new(&engine);

        assert!(header.validate().is_ok());
        assert_eq!(header.timestamp.len(), 14);

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_load_header_only() {
        let path = std::env::temp_dir().join("rmdvc_test_header.sav");

        let engine = test_engine();
        save_game(&engine, &path).unwrap();
        let header = load_header(&path).unwrap();
        assert_eq!(header.player_name, "Saver");
        assert_eq!(header.version, SAVE_VERSION);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_game("/nonexistent/path/save.sav");
        assert!(matches!(result, Err(SaveError::NotFound(_))));
    }

    #[test]
    fn test_corrupted_gzip_rejected() {
        let path = std::env::temp_dir().join("rmdvc_test_corrupt.sav");
        let mut bytes = GZIP_MAGIC.to_vec();
        bytes.extend_from_slice(b"not actually gzip");
        std::fs::write(&path, bytes).unwrap();

        let result = load_game(&path);
        assert!(matches!(result, Err(SaveError::Corrupted(_))));

        std::fs::remove_file(&path).ok();
    }
}
