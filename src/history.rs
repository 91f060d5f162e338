//! Local scan history journal.
//!
//! One row per completed scan, recorded when the lifecycle reaches
//! `Result`. This is scan history, not profile data: it feeds the
//! "recent scans" affordances and nothing reads it back into the
//! pipeline.

use anyhow::Result;
use rusqlite::{params, Connection};

use crate::insight::ScanInsight;
use crate::now_s;

/// Decision string recorded per scan.
fn decision_for(recyclable: bool) -> &'static str {
    if recyclable {
        "Recycle"
    } else {
        "Special Drop-off"
    }
}

/// One journalled scan, as re-read from storage.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanRecord {
    pub id: i64,
    pub created_at: i64,
    pub item_name: String,
    pub material: String,
    pub confidence_percent: u8,
    pub decision: String,
    pub co2_label: String,
    pub used_fallback_model: bool,
}

pub struct ScanHistory {
    conn: Connection,
}

impl ScanHistory {
    /// Open (or create) the journal at `db_path`. `:memory:` is
    /// accepted for tests and the demo.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let mut history = Self { conn };
        history.ensure_schema()?;
        Ok(history)
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              created_at INTEGER NOT NULL,
              item_name TEXT NOT NULL,
              material TEXT NOT NULL,
              confidence_percent INTEGER NOT NULL,
              decision TEXT NOT NULL,
              co2_label TEXT NOT NULL,
              used_fallback_model INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_scans_created ON scans(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Journal one completed scan.
    pub fn record(&mut self, insight: &ScanInsight) -> Result<i64> {
        let created_at = now_s()? as i64;
        self.conn.execute(
            r#"
            INSERT INTO scans(
                created_at,
                item_name,
                material,
                confidence_percent,
                decision,
                co2_label,
                used_fallback_model
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                created_at,
                insight.display_item_name,
                insight.material_label,
                insight.confidence_percent as i64,
                decision_for(insight.recyclable),
                insight.co2_impact_label,
                insight.used_fallback_model as i64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent scans, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ScanRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, created_at, item_name, material, confidence_percent,
                   decision, co2_label, used_fallback_model
            FROM scans ORDER BY id DESC LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ScanRecord {
                id: row.get(0)?,
                created_at: row.get(1)?,
                item_name: row.get(2)?,
                material: row.get(3)?,
                confidence_percent: row.get::<_, i64>(4)? as u8,
                decision: row.get(5)?,
                co2_label: row.get(6)?,
                used_fallback_model: row.get::<_, i64>(7)? != 0,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?)
    }
}
