//! SQLite-backed build store

use crate::error::{Error, Result};
use crate::store::{BuildLookup, BuildStore};
use crate::types::{Asset, Branch, BranchTag, Build, DetectedBuild, Detection, ScriptType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

const SCHEMA: &str = include_str!("./schema.sql");

/// Build store over a single SQLite connection
///
/// Queries run on the blocking thread pool. Clones share the connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("Journal mode: {journal_mode}");

        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool
    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn)
        })
        .await??;

        Ok(result)
    }

    /// Record that a build was detected on a branch
    pub async fn record_deploy(
        &self,
        build: &Build,
        branch: &BranchTag,
        detected_at: DateTime<Utc>,
    ) -> Result<()> {
        let build = build.clone();
        let branch = branch.as_str().to_string();

        debug!(
            "Recording build {} on {} at {}",
            build.number, branch, detected_at
        );

        let conflict = self
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR IGNORE INTO builds (build_id, build_number) VALUES (?1, ?2)",
                    params![build.id, build.number],
                )?;

                // Build identities are immutable: the stored row must agree.
                let stored: Option<u32> = tx
                    .query_row(
                        "SELECT build_number FROM builds WHERE build_id = ?1",
                        [&build.id],
                        |row| row.get(0),
                    )
                    .optional()?;
                match stored {
                    Some(number) if number == build.number => {}
                    Some(number) => {
                        return Ok(Some(format!(
                            "build {} is already recorded as number {number}, not {}",
                            build.id, build.number
                        )));
                    }
                    None => {
                        return Ok(Some(format!(
                            "build number {} already belongs to another build, not {}",
                            build.number, build.id
                        )));
                    }
                }

                tx.execute(
                    "INSERT INTO build_deploys (build_id, branch, detected_at) VALUES (?1, ?2, ?3)",
                    params![build.id, branch, detected_at.timestamp()],
                )?;
                tx.commit()?;
                Ok(None)
            })
            .await?;

        match conflict {
            Some(message) => Err(Error::Conflict(message)),
            None => Ok(()),
        }
    }

    /// Attach an asset to a build
    pub async fn record_asset(&self, build_id: &str, asset: &Asset) -> Result<()> {
        let build_id = build_id.to_string();
        let asset = asset.clone();

        self.call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO assets (name, surface, surface_script_type, script_chunk_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    asset.name,
                    asset.surface,
                    asset.surface_script_type.map(ScriptType::as_str),
                    asset.script_chunk_id,
                ],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO build_assets (build_id, asset_name) VALUES (?1, ?2)",
                params![build_id, asset.name],
            )?;
            tx.commit()
        })
        .await
    }
}

fn timestamp_from_column(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let seconds: i64 = row.get(column)?;
    let index = row.as_ref().column_index(column)?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(index, seconds))
}

fn detected_build_from_row(row: &Row<'_>) -> rusqlite::Result<DetectedBuild> {
    let branch: String = row.get("branch")?;
    Ok(DetectedBuild {
        build: Build {
            id: row.get("build_id")?,
            number: row.get("build_number")?,
        },
        branch: BranchTag::from(branch),
        detected_at: timestamp_from_column(row, "detected_at")?,
    })
}

fn build_from_row(row: &Row<'_>) -> rusqlite::Result<Build> {
    Ok(Build {
        id: row.get("build_id")?,
        number: row.get("build_number")?,
    })
}

#[async_trait]
impl BuildStore for SqliteStore {
    async fn latest_build_on_branch(&self, branch: Branch) -> Result<Option<DetectedBuild>> {
        self.call(move |conn| {
            conn.query_row(
                "SELECT build_id, build_number, branch, detected_at
                 FROM detections
                 WHERE branch = ?1
                 ORDER BY detected_at DESC, deploy_id DESC
                 LIMIT 1",
                [branch.as_str()],
                detected_build_from_row,
            )
            .optional()
        })
        .await
    }

    async fn latest_build_ids(&self) -> Result<HashMap<Branch, String>> {
        let rows = self
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT branch, build_id
                     FROM (
                       SELECT
                         branch,
                         build_id,
                         ROW_NUMBER() OVER (
                           PARTITION BY branch
                           ORDER BY detected_at DESC, id DESC
                         ) AS position
                       FROM build_deploys
                     )
                     WHERE position = 1",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(branch, build_id)| match branch.parse::<Branch>() {
                Ok(branch) => Some((branch, build_id)),
                Err(_) => {
                    debug!("Skipping unknown branch tag {branch}");
                    None
                }
            })
            .collect())
    }

    async fn detections_since(&self, since: DateTime<Utc>) -> Result<Vec<DetectedBuild>> {
        let detections = self
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT build_id, build_number, branch, detected_at
                     FROM detections
                     WHERE detected_at > ?1
                     ORDER BY detected_at DESC, deploy_id DESC",
                )?;
                let rows = stmt
                    .query_map([since.timestamp()], detected_build_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        debug!("Found {} detections since {}", detections.len(), since);
        Ok(detections)
    }

    async fn find_previous_build(
        &self,
        branch: &BranchTag,
        before: DateTime<Utc>,
    ) -> Result<Option<Build>> {
        let branch = branch.as_str().to_string();
        self.call(move |conn| {
            conn.query_row(
                "SELECT build_id, build_number
                 FROM detections
                 WHERE branch = ?1 AND detected_at < ?2
                 ORDER BY detected_at DESC, deploy_id DESC
                 LIMIT 1",
                params![branch, before.timestamp()],
                build_from_row,
            )
            .optional()
        })
        .await
    }

    async fn fetch_detections(&self, build_id: &str) -> Result<Vec<Detection>> {
        let build_id = build_id.to_string();
        self.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT branch, detected_at
                 FROM build_deploys
                 WHERE build_id = ?1
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([build_id], |row| {
                    let branch: String = row.get("branch")?;
                    Ok(Detection {
                        branch: BranchTag::from(branch),
                        detected_at: timestamp_from_column(row, "detected_at")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }

    async fn fetch_build(&self, lookup: &BuildLookup) -> Result<Option<Build>> {
        let lookup = lookup.clone();
        debug!("Fetching build by {lookup}");

        self.call(move |conn| match lookup {
            BuildLookup::Number(number) => {
                // Numbers past i64 cannot be stored, so they cannot match.
                let Ok(number) = i64::try_from(number) else {
                    return Ok(None);
                };
                conn.query_row(
                    "SELECT build_id, build_number FROM builds WHERE build_number = ?1",
                    [number],
                    build_from_row,
                )
                .optional()
            }
            BuildLookup::Id(id) => conn
                .query_row(
                    "SELECT build_id, build_number FROM builds WHERE build_id = ?1",
                    [id],
                    build_from_row,
                )
                .optional(),
        })
        .await
    }

    async fn fetch_build_assets(&self, build_id: &str) -> Result<Vec<Asset>> {
        let build_id = build_id.to_string();
        self.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT assets.name, assets.surface, assets.surface_script_type, assets.script_chunk_id
                 FROM build_assets
                 INNER JOIN assets ON assets.name = build_assets.asset_name
                 WHERE build_assets.build_id = ?1
                 ORDER BY assets.name",
            )?;
            let rows = stmt
                .query_map([build_id], |row| {
                    let script_type: Option<String> = row.get("surface_script_type")?;
                    Ok(Asset {
                        name: row.get("name")?,
                        surface: row.get("surface")?,
                        surface_script_type: script_type.and_then(|tag| tag.parse().ok()),
                        script_chunk_id: row.get("script_chunk_id")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }
}
