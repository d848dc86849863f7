//! # popit-core
//!
//! Incremental graph synchronization for PopIt-style content repositories.
//!
//! Maps remote person, organization, post, membership and relationship
//! records into a typed multigraph, reconciles the persisted graph cache
//! one entity type at a time, and exposes the cache for mirroring into a
//! property-graph store.

pub mod builder;
pub mod cache;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod settings;
pub mod uri;
pub mod vocab;

pub use cache::{CacheStats, EdgeKey, GraphCache, MergeStats, MultiGraph, PruneStats};
pub use error::{BuildError, FetchError, PopitError, PopitResult};
pub use fetch::{Cursor, EntityFetcher, Page, page_stream};
pub use model::{Attributes, Fragment, Predicate, Triple};
pub use reconcile::{PassReport, PassState, Reconciler};
pub use registry::{EntityType, TypeSpec};
pub use settings::{GraphConfig, Settings};
