//! Finished-game archive using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The [`ArchiveSink`] seam the game hands finished records to
//! - Read-back of archived games and win/draw totals

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::game::{GameRecord, Mode, Outcome, PlayerId};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and games tables
const SCHEMA_VERSION: u32 = 1;

/// Database file name inside the data directory
const DB_FILE: &str = "sos.db";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("record encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Proof that a record was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveReceipt {
    /// Row id of the stored game
    pub id: i64,
}

/// Somewhere finished games can be sent. The game core only knows this seam.
pub trait ArchiveSink {
    fn archive(&mut self, record: &GameRecord) -> Result<ArchiveReceipt, StorageError>;
}

/// Totals across every archived game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveTally {
    pub games: u32,
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    pub draws: u32,
}

/// The SQLite-backed archive.
pub struct Archive {
    conn: Connection,
}

impl Archive {
    /// Open or create the archive at `path`, or in the OS data directory:
    /// - Linux: `$XDG_DATA_HOME/sos/` or `~/.local/share/sos/`
    /// - macOS: `~/Library/Application Support/sos/`
    pub fn open(path: Option<&Path>) -> Result<Self, StorageError> {
        let db_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let data_dir = Self::data_dir()?;
                std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
                data_dir.join(DB_FILE)
            }
        };

        let conn = Connection::open(&db_path)?;
        let archive = Archive { conn };
        archive.initialize_schema()?;
        info!(path = %db_path.display(), games = archive.count()?, "archive opened");
        Ok(archive)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let archive = Archive { conn };
        archive.initialize_schema()?;
        Ok(archive)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "sos")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Fetch one archived game.
    pub fn record(&self, id: i64) -> Result<Option<GameRecord>, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM games WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        payload
            .map(|json| GameRecord::from_json(&json).map_err(StorageError::from))
            .transpose()
    }

    /// Most recent games first, at most `limit`.
    pub fn recent(&self, limit: u32) -> Result<Vec<(i64, GameRecord)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM games ORDER BY id DESC LIMIT ?1")?;
        let ids = stmt
            .query_map(params![limit], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.record(id)? {
                records.push((id, record));
            }
        }
        Ok(records)
    }

    /// Number of archived games.
    pub fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Wins per seat and draws across the archive.
    pub fn tally(&self) -> Result<ArchiveTally, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT outcome, COUNT(*) FROM games GROUP BY outcome")?;
        let rows = stmt.query_map([], |row| {
            let outcome: String = row.get(0)?;
            let count: u32 = row.get(1)?;
            Ok((outcome, count))
        })?;

        let mut tally = ArchiveTally::default();
        for row in rows {
            let (outcome, count) = row?;
            tally.games += count;
            match outcome.as_str() {
                "player_one" => tally.player_one_wins += count,
                "player_two" => tally.player_two_wins += count,
                _ => tally.draws += count,
            }
        }
        Ok(tally)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of this program
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and creation time
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Games table: one row per archived game
            -- Summary columns for queries, full record as JSON payload
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                played_at TEXT NOT NULL,
                board_size INTEGER NOT NULL,
                mode TEXT NOT NULL,
                player_one_score INTEGER NOT NULL,
                player_two_score INTEGER NOT NULL,
                outcome TEXT NOT NULL,
                payload TEXT NOT NULL
            );

            -- Index for chronological listing
            CREATE INDEX IF NOT EXISTS idx_games_played ON games (played_at);
            "#,
        )?;

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, created_at],
        )?;

        Ok(())
    }
}

impl ArchiveSink for Archive {
    fn archive(&mut self, record: &GameRecord) -> Result<ArchiveReceipt, StorageError> {
        let payload = record.to_json()?;
        let mode = match record.mode {
            Mode::Pvp => "pvp",
            Mode::Pvc => "pvc",
        };

        self.conn.execute(
            "INSERT INTO games (played_at, board_size, mode, player_one_score, player_two_score, outcome, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.timestamp.to_rfc3339(),
                record.board_size as i64,
                mode,
                record.scores.player_one,
                record.scores.player_two,
                outcome_key(record.outcome),
                payload
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, winner = %record.winner_text, "game archived");
        Ok(ArchiveReceipt { id })
    }
}

fn outcome_key(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Winner(PlayerId::PlayerOne) => "player_one",
        Outcome::Winner(PlayerId::PlayerTwo) => "player_two",
        Outcome::Draw => "draw",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{new_game, GameState, Letter, Move, MoveSource};

    /// Play a 3×3 game to the end. With `score` player one completes the
    /// top row; otherwise every cell is 'O' and the game is drawn.
    fn finished_game(score: bool) -> GameState {
        let mut state = new_game(3, Mode::Pvp).state;
        for r in 0..3 {
            for c in 0..3 {
                let letter = if score && r == 0 && c != 1 {
                    Letter::S
                } else {
                    Letter::O
                };
                state
                    .apply_move(Move::new(r, c, letter), MoveSource::Human)
                    .unwrap();
            }
        }
        state
    }

    #[test]
    fn test_archive_creation() {
        let archive = Archive::open_in_memory().unwrap();
        assert_eq!(archive.count().unwrap(), 0);
        assert_eq!(archive.tally().unwrap(), ArchiveTally::default());
    }

    #[test]
    fn test_schema_version_is_current() {
        let archive = Archive::open_in_memory().unwrap();
        assert_eq!(archive.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_reinitialize_is_idempotent() {
        let archive = Archive::open_in_memory().unwrap();
        archive.initialize_schema().unwrap();
        assert_eq!(archive.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_future_schema_rejected() {
        let archive = Archive::open_in_memory().unwrap();
        archive
            .conn
            .execute("UPDATE meta SET schema_version = 99", [])
            .unwrap();
        assert!(matches!(
            archive.initialize_schema(),
            Err(StorageError::FutureSchemaVersion {
                found: 99,
                supported: 1
            })
        ));
    }

    #[test]
    fn test_archive_and_read_back() {
        let mut archive = Archive::open_in_memory().unwrap();
        let record = finished_game(true).record().unwrap();

        let receipt = archive.archive(&record).unwrap();
        assert_eq!(archive.count().unwrap(), 1);

        let stored = archive.record(receipt.id).unwrap().unwrap();
        assert_eq!(stored, record);
        assert!(archive.record(receipt.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_recent_newest_first() {
        let mut archive = Archive::open_in_memory().unwrap();
        let first = archive
            .archive(&finished_game(true).record().unwrap())
            .unwrap();
        let second = archive
            .archive(&finished_game(false).record().unwrap())
            .unwrap();
        assert!(second.id > first.id);

        let recent = archive.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].0, second.id);
        assert_eq!(recent[0].1.outcome, Outcome::Draw);

        assert_eq!(archive.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn test_tally() {
        let mut archive = Archive::open_in_memory().unwrap();
        let win = finished_game(true).record().unwrap();
        let draw = finished_game(false).record().unwrap();
        archive.archive(&win).unwrap();
        archive.archive(&win).unwrap();
        archive.archive(&draw).unwrap();

        let tally = archive.tally().unwrap();
        assert_eq!(
            tally,
            ArchiveTally {
                games: 3,
                player_one_wins: 2,
                player_two_wins: 0,
                draws: 1,
            }
        );
    }

    #[test]
    fn test_open_file_path() {
        let path = std::env::temp_dir().join(format!("sos-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut archive = Archive::open(Some(&path)).unwrap();
            archive
                .archive(&finished_game(false).record().unwrap())
                .unwrap();
        }
        let archive = Archive::open(Some(&path)).unwrap();
        assert_eq!(archive.count().unwrap(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_data_dir() {
        // Should return a valid path on supported platforms
        if let Ok(dir) = Archive::data_dir() {
            assert!(dir.to_string_lossy().contains("sos"));
        }
    }
}
