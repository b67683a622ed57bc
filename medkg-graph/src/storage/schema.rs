//! DuckDB schema for the knowledge graph.
//!
//! Node labels and relation names are stored as plain columns, so every
//! label comes from `medkg_core::schema` and is bound as a parameter.

/// SQL schema for creating the knowledge graph tables.
pub const SCHEMA_SQL: &str = r#"
-- Nodes table: one row per (label, name)
-- properties holds a JSON object as text
CREATE TABLE IF NOT EXISTS nodes (
    label VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    properties VARCHAR NOT NULL DEFAULT '{}',
    PRIMARY KEY (label, name)
);

-- Edges table: directed, at most one edge per relation between two nodes
CREATE TABLE IF NOT EXISTS edges (
    relation VARCHAR NOT NULL,
    source_label VARCHAR NOT NULL,
    source_name VARCHAR NOT NULL,
    target_label VARCHAR NOT NULL,
    target_name VARCHAR NOT NULL,
    PRIMARY KEY (relation, source_label, source_name, target_label, target_name)
);

-- Metadata table: schema version, build info
CREATE TABLE IF NOT EXISTS metadata (
    key VARCHAR PRIMARY KEY,
    value VARCHAR
);

CREATE INDEX IF NOT EXISTS idx_nodes_label ON nodes(label);
CREATE INDEX IF NOT EXISTS idx_edges_relation ON edges(relation);
CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_label, source_name);
CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_label, target_name);
"#;

/// Schema version written to the metadata table.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Metadata key for the schema version.
pub const META_SCHEMA_VERSION: &str = "schema_version";

/// Metadata key for the RFC 3339 timestamp of the last completed build.
pub const META_LAST_BUILD: &str = "last_build_at";
