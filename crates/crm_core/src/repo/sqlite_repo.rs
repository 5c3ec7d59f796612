//! SQLite-backed record repository.
//!
//! # Responsibility
//! - Persist any record type as a JSON document keyed by `(collection, id)`.
//! - Keep id assignment monotonic through `collection_sequences`.
//!
//! # Invariants
//! - Stored order is insertion order (`rowid`); updates keep a row's position.
//! - Read paths reject undecodable bodies instead of skipping them.

use crate::model::record::{Record, RecordId};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;

/// SQLite repository for one record collection.
pub struct SqliteRecordRepository<'conn, R: Record> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: Record> SqliteRecordRepository<'conn, R> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    /// Upserts records with their existing ids, e.g. from a seed file.
    ///
    /// Advances the id high-water mark to the max imported id.
    pub fn import_records(&self, records: &[R]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            let body = serde_json::to_string(record)?;
            tx.execute(
                "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, id) DO UPDATE SET
                    body = excluded.body,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![R::COLLECTION, record.id(), body],
            )?;
        }
        if let Some(max_id) = records.iter().map(Record::id).max() {
            bump_sequence(&tx, R::COLLECTION, max_id)?;
        }
        tx.commit()?;
        Ok(records.len())
    }
}

impl<R: Record> RecordRepository<R> for SqliteRecordRepository<'_, R> {
    fn list_records(&self) -> RepoResult<Vec<R>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM records
             WHERE collection = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([R::COLLECTION])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            records.push(decode_body(body.as_str())?);
        }
        Ok(records)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2;",
                params![R::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|body| decode_body(body.as_str())).transpose()
    }

    fn insert_record(&self, mut record: R) -> RepoResult<R> {
        let tx = self.conn.unchecked_transaction()?;
        let last_sequence: RecordId = tx
            .query_row(
                "SELECT last_id FROM collection_sequences WHERE collection = ?1;",
                [R::COLLECTION],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);
        let max_stored: RecordId = tx.query_row(
            "SELECT COALESCE(MAX(id), 0) FROM records WHERE collection = ?1;",
            [R::COLLECTION],
            |row| row.get(0),
        )?;

        let id = last_sequence.max(max_stored) + 1;
        record.assign_id(id);
        let body = serde_json::to_string(&record)?;
        tx.execute(
            "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3);",
            params![R::COLLECTION, id, body],
        )?;
        bump_sequence(&tx, R::COLLECTION, id)?;
        tx.commit()?;

        debug!(
            "event=record_insert module=repo status=ok backend=sqlite collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(record)
    }

    fn update_record(&self, record: &R) -> RepoResult<R> {
        let body = serde_json::to_string(record)?;
        let changed = self.conn.execute(
            "UPDATE records
             SET
                body = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?2 AND id = ?3;",
            params![body, R::COLLECTION, record.id()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found::<R>(record.id()));
        }

        debug!(
            "event=record_update module=repo status=ok backend=sqlite collection={} id={}",
            R::COLLECTION,
            record.id()
        );
        Ok(record.clone())
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
            params![R::COLLECTION, id],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found::<R>(id));
        }

        debug!(
            "event=record_delete module=repo status=ok backend=sqlite collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(())
    }
}

fn bump_sequence(conn: &Connection, collection: &str, id: RecordId) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO collection_sequences (collection, last_id) VALUES (?1, ?2)
         ON CONFLICT (collection) DO UPDATE SET
            last_id = MAX(last_id, excluded.last_id);",
        params![collection, id],
    )?;
    Ok(())
}

fn decode_body<R: Record>(body: &str) -> RepoResult<R> {
    serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid body in records for collection `{}`: {err}",
            R::COLLECTION
        ))
    })
}
