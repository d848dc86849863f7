//! # popit-fetch
//!
//! Paginated access to a Plone `@search` endpoint, implementing
//! [`popit_core::EntityFetcher`].

pub mod client;

pub use client::PloneFetcher;
