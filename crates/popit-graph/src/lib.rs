//! # popit-graph
//!
//! Neo4j mirror of the popit graph cache.
//!
//! The cache is the only source of truth: every write here is a MERGE
//! derived from it, apart from the explicit full reset.

pub mod client;
pub mod mirror;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphCounts};
pub use mirror::{MirrorPlan, MirrorReport, mirror, plan};
pub use popit_core::GraphConfig;
pub use schema::initialize_schema;
pub use store::{GraphStore, NodeUpsert, RelationshipUpsert};
