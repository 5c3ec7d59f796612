//! Seed data loading for mock mode.
//!
//! # Responsibility
//! - Load one JSON array per collection (`<dir>/<collection>.json`).
//! - Route every record through the model normalization boundary.
//!
//! # Invariants
//! - Seed files are read wholesale and never written back.
//! - A seed file with duplicate ids is rejected as a whole.
//! - A missing seed file means an empty collection.

use crate::config::CoreConfig;
use crate::model::record::{Record, RecordId};
use crate::model::sms::SmsMessage;
use crate::repo::memory_repo::MemoryRepository;
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Seed loading error.
#[derive(Debug)]
pub enum SeedError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        collection: &'static str,
        source: serde_json::Error,
    },
    DuplicateId {
        collection: &'static str,
        id: RecordId,
    },
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read seed file `{}`: {source}", path.display())
            }
            Self::Parse { collection, source } => {
                write!(f, "invalid seed data for {collection}: {source}")
            }
            Self::DuplicateId { collection, id } => {
                write!(f, "duplicate id {id} in {collection} seed data")
            }
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::DuplicateId { .. } => None,
        }
    }
}

/// Parses a JSON array of records.
pub fn parse_seed<R: Record>(json: &str) -> Result<Vec<R>, SeedError> {
    let records: Vec<R> = serde_json::from_str(json).map_err(|source| SeedError::Parse {
        collection: R::COLLECTION,
        source,
    })?;

    let mut seen = BTreeSet::new();
    for record in &records {
        if !seen.insert(record.id()) {
            return Err(SeedError::DuplicateId {
                collection: R::COLLECTION,
                id: record.id(),
            });
        }
    }
    Ok(records)
}

/// Path of the seed file for `R` inside `seed_dir`.
pub fn seed_path<R: Record>(seed_dir: &Path) -> PathBuf {
    seed_dir.join(format!("{}.json", R::COLLECTION))
}

/// Loads the seed file for `R` from `seed_dir`, or nothing when absent.
pub fn load_collection<R: Record>(seed_dir: &Path) -> Result<Vec<R>, SeedError> {
    let path = seed_path::<R>(seed_dir);
    if !path.exists() {
        info!(
            "event=seed_load module=seed status=skipped collection={} reason=missing_file",
            R::COLLECTION
        );
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&path).map_err(|source| SeedError::Io {
        path: path.clone(),
        source,
    })?;
    let records = parse_seed::<R>(json.as_str())?;
    info!(
        "event=seed_load module=seed status=ok collection={} count={}",
        R::COLLECTION,
        records.len()
    );
    Ok(records)
}

/// Loads `sms_messages.json` from `seed_dir`, or nothing when absent.
pub fn load_messages(seed_dir: &Path) -> Result<Vec<SmsMessage>, SeedError> {
    const COLLECTION: &str = "sms_messages";
    let path = seed_dir.join(format!("{COLLECTION}.json"));
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(&path).map_err(|source| SeedError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(json.as_str()).map_err(|source| SeedError::Parse {
        collection: COLLECTION,
        source,
    })
}

/// Memory repository seeded from `config.seed_dir` with the configured latency.
pub fn seeded_memory<R: Record>(config: &CoreConfig) -> Result<MemoryRepository<R>, SeedError> {
    let records = match &config.seed_dir {
        Some(dir) => load_collection::<R>(dir)?,
        None => Vec::new(),
    };
    let repo = MemoryRepository::with_records(records);
    Ok(match config.storage.simulated_latency() {
        Some(latency) => repo.with_latency(latency),
        None => repo,
    })
}

#[cfg(test)]
mod tests {
    use super::{load_collection, load_messages, parse_seed, seeded_memory, SeedError};
    use crate::config::CoreConfig;
    use crate::model::campaign::Campaign;
    use crate::model::contact::{Contact, ContactStage};
    use crate::repo::RecordRepository;

    #[test]
    fn parse_seed_normalizes_legacy_field_names() {
        let json = r#"[
            {"Id": 1, "Name": "Ada", "email": "ada@example.com", "Tags": "vip,lead",
             "stage": "Qualified", "lastActivity": 1700000000000}
        ]"#;
        let contacts = parse_seed::<Contact>(json).unwrap();
        assert_eq!(contacts[0].name, "Ada");
        assert_eq!(contacts[0].tags, vec!["vip", "lead"]);
        assert_eq!(contacts[0].stage, ContactStage::Qualified);
        assert_eq!(contacts[0].last_activity, 1_700_000_000_000);
    }

    #[test]
    fn parse_seed_accepts_rfc3339_timestamps() {
        let json = r#"[{"Id": 1, "Name": "Spring", "status": "Draft",
                        "created_at": "2024-01-15T10:00:00.000Z"}]"#;
        let campaigns = parse_seed::<Campaign>(json).unwrap();
        assert_eq!(campaigns[0].created_at, 1_705_312_800_000);
    }

    #[test]
    fn load_messages_reads_iso_history_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sms_messages.json"),
            r#"[{"Id": 1, "conversationId": 1, "content": "Hi, I'm interested in your CRM solution.",
                 "sender": "customer", "timestamp": "2024-01-15T10:00:00Z"},
                {"Id": 2, "conversationId": 1, "content": "Hello!",
                 "sender": "agent", "timestamp": "2024-01-15T10:05:00Z"}]"#,
        )
        .unwrap();

        let messages = load_messages(dir.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].timestamp, 1_705_312_800_000);
        assert_eq!(messages[1].timestamp - messages[0].timestamp, 5 * 60 * 1000);
    }

    #[test]
    fn parse_seed_rejects_duplicate_ids() {
        let json = r#"[{"id": 1, "name": "a"}, {"id": 1, "name": "b"}]"#;
        let err = parse_seed::<Contact>(json).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn missing_seed_files_mean_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_collection::<Campaign>(dir.path()).unwrap().is_empty());
        assert!(load_messages(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn seeded_memory_reads_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("contacts.json"),
            r#"[{"id": 4, "name": "Ada", "email": "ada@example.com"}]"#,
        )
        .unwrap();
        let config = CoreConfig {
            seed_dir: Some(dir.path().to_path_buf()),
            ..CoreConfig::default()
        };

        let repo = seeded_memory::<Contact>(&config).unwrap();
        let stored = repo.list_records().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, 4);
    }
}
