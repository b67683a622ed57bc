//! KgBase - DuckDB-based storage for the knowledge graph.

use anyhow::{Context, Result};
use duckdb::{params, Config, Connection};
use medkg_core::{EntityKind, PropertyMap, RelationKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::edges::{Edge, EdgeOutcome, EdgeRef};
use super::nodes::Node;
use super::schema::{META_LAST_BUILD, META_SCHEMA_VERSION, SCHEMA_SQL, SCHEMA_VERSION};
use super::{GraphStats, GraphStore};

/// Database access mode for concurrent access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Read-write mode (exclusive lock, for builds)
    #[default]
    ReadWrite,
    /// Read-only mode (shared access, for stats and lookups)
    ReadOnly,
}

/// KgBase - DuckDB-based storage for the medical knowledge graph.
pub struct KgBase {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
    mode: AccessMode,
}

impl KgBase {
    /// Open or create a database in read-write mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::ReadWrite)
    }

    /// Open an existing database in read-only mode.
    ///
    /// Several read-only handles can coexist; the schema is not touched.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::ReadOnly)
    }

    /// Open a database with the specified access mode.
    pub fn open_with_mode(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();

        let conn = match mode {
            AccessMode::ReadWrite => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory: {:?}", parent)
                    })?;
                }
                Connection::open(path)
                    .with_context(|| format!("Failed to open database: {:?}", path))?
            }
            AccessMode::ReadOnly => {
                let config = Config::default()
                    .access_mode(duckdb::AccessMode::ReadOnly)
                    .map_err(|e| anyhow::anyhow!("Failed to set read-only mode: {}", e))?;
                Connection::open_with_flags(path, config).with_context(|| {
                    format!("Failed to open database in read-only mode: {:?}", path)
                })?
            }
        };

        let kgbase = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
            mode,
        };

        if mode == AccessMode::ReadWrite {
            kgbase.init_schema()?;
        }

        Ok(kgbase)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let kgbase = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
            mode: AccessMode::ReadWrite,
        };
        kgbase.init_schema()?;
        Ok(kgbase)
    }

    /// Database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Acquire the database connection lock, handling PoisonError gracefully.
    /// A panicked holder does not invalidate the connection itself.
    fn acquire_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        match self.conn.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                tracing::warn!("Recovering from poisoned database mutex");
                Ok(poisoned.into_inner())
            }
        }
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.acquire_conn()?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;

        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            params![META_SCHEMA_VERSION, SCHEMA_VERSION],
        )
        .context("Failed to set schema version")?;

        Ok(())
    }

    /// Connectivity check.
    pub fn check(&self) -> Result<()> {
        let conn = self.acquire_conn()?;
        let one: i32 = conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .context("Connectivity check failed")?;
        anyhow::ensure!(one == 1, "Connectivity check returned {}", one);
        Ok(())
    }

    /// Schema version recorded in the database, if any.
    pub fn schema_version(&self) -> Result<Option<String>> {
        self.metadata(META_SCHEMA_VERSION)
    }

    /// Timestamp of the last completed build, if any.
    pub fn last_build_at(&self) -> Result<Option<String>> {
        self.metadata(META_LAST_BUILD)
    }

    /// Record that a build finished now.
    pub fn mark_build(&self) -> Result<String> {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.acquire_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            params![META_LAST_BUILD, now],
        )
        .context("Failed to record build time")?;
        Ok(now)
    }

    fn metadata(&self, key: &str) -> Result<Option<String>> {
        let conn = self.acquire_conn()?;
        Self::read_metadata(&conn, key)
    }

    fn read_metadata(conn: &Connection, key: &str) -> Result<Option<String>> {
        let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = ?")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(None),
        }
    }

    fn node_exists(conn: &Connection, kind: EntityKind, name: &str) -> Result<bool> {
        let count: usize = conn.query_row(
            "SELECT COUNT(*) FROM nodes WHERE label = ? AND name = ?",
            params![kind.label(), name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn load_properties(
        conn: &Connection,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<PropertyMap>> {
        let mut stmt = conn.prepare("SELECT properties FROM nodes WHERE label = ? AND name = ?")?;
        let mut rows = stmt.query(params![kind.label(), name])?;
        match rows.next()? {
            Some(row) => {
                let raw: String = row.get(0)?;
                let props = serde_json::from_str(&raw).with_context(|| {
                    format!("Corrupt properties on {} node {:?}", kind.label(), name)
                })?;
                Ok(Some(props))
            }
            None => Ok(None),
        }
    }
}

impl GraphStore for KgBase {
    fn upsert_node(&self, kind: EntityKind, name: &str) -> Result<bool> {
        let conn = self.acquire_conn()?;
        if Self::node_exists(&conn, kind, name)? {
            return Ok(false);
        }
        conn.execute(
            "INSERT INTO nodes (label, name) VALUES (?, ?)",
            params![kind.label(), name],
        )
        .with_context(|| format!("Failed to insert {} node: {}", kind.label(), name))?;
        Ok(true)
    }

    fn upsert_edge(&self, edge: &EdgeRef<'_>) -> Result<EdgeOutcome> {
        let conn = self.acquire_conn()?;
        if !Self::node_exists(&conn, edge.source_kind, edge.source)?
            || !Self::node_exists(&conn, edge.target_kind, edge.target)?
        {
            return Ok(EdgeOutcome::MissingEndpoint);
        }

        let existing: usize = conn.query_row(
            r#"SELECT COUNT(*) FROM edges
               WHERE relation = ? AND source_label = ? AND source_name = ?
                 AND target_label = ? AND target_name = ?"#,
            params![
                edge.relation.label(),
                edge.source_kind.label(),
                edge.source,
                edge.target_kind.label(),
                edge.target,
            ],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(EdgeOutcome::Existing);
        }

        conn.execute(
            r#"INSERT INTO edges
               (relation, source_label, source_name, target_label, target_name)
               VALUES (?, ?, ?, ?, ?)"#,
            params![
                edge.relation.label(),
                edge.source_kind.label(),
                edge.source,
                edge.target_kind.label(),
                edge.target,
            ],
        )
        .with_context(|| {
            format!(
                "Failed to insert {} edge: {} -> {}",
                edge.relation, edge.source, edge.target
            )
        })?;
        Ok(EdgeOutcome::Created)
    }

    fn set_properties(&self, kind: EntityKind, name: &str, props: &PropertyMap) -> Result<bool> {
        let conn = self.acquire_conn()?;
        let Some(mut current) = Self::load_properties(&conn, kind, name)? else {
            return Ok(false);
        };

        for (key, value) in props {
            current.insert(key.clone(), value.clone());
        }
        let json = serde_json::to_string(&current).context("Failed to serialize properties")?;

        conn.execute(
            "UPDATE nodes SET properties = ? WHERE label = ? AND name = ?",
            params![json, kind.label(), name],
        )
        .with_context(|| format!("Failed to set properties on {} node: {}", kind.label(), name))?;
        Ok(true)
    }

    fn nodes_with_property(&self, kind: EntityKind, key: &str) -> Result<Vec<(String, String)>> {
        let conn = self.acquire_conn()?;
        let mut stmt =
            conn.prepare("SELECT name, properties FROM nodes WHERE label = ? ORDER BY name")?;
        let mut rows = stmt.query(params![kind.label()])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let raw: String = row.get(1)?;
            let mut node = Node::new(kind, name);
            match serde_json::from_str::<PropertyMap>(&raw) {
                Ok(props) => node.properties = props,
                Err(e) => {
                    debug!(
                        label = kind.label(),
                        name = %node.name,
                        "Skipping unreadable properties: {}",
                        e
                    );
                    continue;
                }
            }
            if let Some(text) = node.non_empty_text(key) {
                let text = text.to_string();
                out.push((node.name, text));
            }
        }
        Ok(out)
    }

    fn get_node(&self, kind: EntityKind, name: &str) -> Result<Option<Node>> {
        let conn = self.acquire_conn()?;
        Ok(Self::load_properties(&conn, kind, name)?.map(|properties| Node {
            kind,
            name: name.to_string(),
            properties,
        }))
    }

    fn edges(&self, relation: RelationKind) -> Result<Vec<Edge>> {
        let conn = self.acquire_conn()?;
        let mut stmt = conn.prepare(
            "SELECT source_name, target_name FROM edges WHERE relation = ?
             ORDER BY source_name, target_name",
        )?;
        let mut rows = stmt.query(params![relation.label()])?;

        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(Edge {
                relation,
                source: row.get(0)?,
                target: row.get(1)?,
            });
        }
        Ok(edges)
    }

    fn stats(&self) -> Result<GraphStats> {
        let conn = self.acquire_conn()?;

        let node_count: usize =
            conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        let edge_count: usize =
            conn.query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?;

        let mut label_counts = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT label, COUNT(*) FROM nodes GROUP BY label")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let label: String = row.get(0)?;
            let count: usize = row.get(1)?;
            label_counts.insert(label, count);
        }

        let mut relation_counts = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT relation, COUNT(*) FROM edges GROUP BY relation")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let relation: String = row.get(0)?;
            let count: usize = row.get(1)?;
            relation_counts.insert(relation, count);
        }

        Ok(GraphStats {
            node_count,
            edge_count,
            label_counts,
            relation_counts,
            last_build_at: Self::read_metadata(&conn, META_LAST_BUILD)?,
        })
    }
}
