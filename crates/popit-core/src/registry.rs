//! Static registry of synchronizable entity types.
//!
//! Each [`EntityType`] resolves to a [`TypeSpec`]: the portal type used to
//! request it, the type URI its nodes are tagged with, the predicate
//! namespaces its records own, and its builder.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::builder;
use crate::error::{BuildError, PopitError};
use crate::model::Fragment;
use crate::vocab;

/// Builder signature shared by every entity type.
pub type Builder = fn(&Value) -> Result<Fragment, BuildError>;

/// Entity types known to the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Person,
    Organization,
    Post,
    Membership,
    Relationship,
}

/// Registry entry for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec {
    pub entity: EntityType,
    /// Selector passed to the fetcher.
    pub portal_type: &'static str,
    /// Target of the type-tag edge for nodes of this type.
    pub type_uri: &'static str,
    /// Predicate namespaces whose edges are produced only by this type.
    pub owned_predicates: &'static [&'static str],
    /// Edge attribute marking edges produced by this type's records.
    pub owned_edge_attribute: Option<&'static str>,
    pub build: Builder,
}

const REGISTRY: [TypeSpec; 5] = [
    TypeSpec {
        entity: EntityType::Person,
        portal_type: "Person",
        type_uri: vocab::person::PERSON,
        owned_predicates: &[],
        owned_edge_attribute: None,
        build: builder::person::build,
    },
    TypeSpec {
        entity: EntityType::Organization,
        portal_type: "Organization",
        type_uri: vocab::org::ORGANIZATION,
        owned_predicates: &[],
        owned_edge_attribute: None,
        build: builder::organization::build,
    },
    TypeSpec {
        entity: EntityType::Post,
        portal_type: "Post",
        type_uri: vocab::org::POST,
        owned_predicates: &[],
        owned_edge_attribute: None,
        build: builder::post::build,
    },
    TypeSpec {
        entity: EntityType::Membership,
        portal_type: "Membership",
        type_uri: vocab::org::MEMBERSHIP,
        owned_predicates: &[],
        owned_edge_attribute: Some(builder::membership::OWNER_ATTRIBUTE),
        build: builder::membership::build,
    },
    TypeSpec {
        entity: EntityType::Relationship,
        portal_type: "Relationship",
        type_uri: vocab::sinar::RELATIONSHIP,
        owned_predicates: &[vocab::sinar::BASE],
        owned_edge_attribute: None,
        build: builder::relationship::build,
    },
];

impl EntityType {
    /// Every type, entities before relationship carriers.
    pub const ALL: [EntityType; 5] = [
        EntityType::Person,
        EntityType::Organization,
        EntityType::Post,
        EntityType::Membership,
        EntityType::Relationship,
    ];

    pub fn spec(self) -> &'static TypeSpec {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::Post => "post",
            EntityType::Membership => "membership",
            EntityType::Relationship => "relationship",
        }
    }

    pub fn type_uri(self) -> &'static str {
        self.spec().type_uri
    }

    /// Run this type's builder on a raw record.
    pub fn build(self, record: &Value) -> Result<Fragment, BuildError> {
        (self.spec().build)(record)
    }

    /// Whether records of this type carry only relationships and no node.
    pub fn is_carrier(self) -> bool {
        !self.spec().owned_predicates.is_empty()
    }

    /// Reverse lookup from a type-tag target.
    pub fn from_type_uri(uri: &str) -> Option<Self> {
        REGISTRY.iter().find(|spec| spec.type_uri == uri).map(|spec| spec.entity)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = PopitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "person" | "persons" => Ok(Self::Person),
            "organization" | "organizations" | "organisation" => Ok(Self::Organization),
            "post" | "posts" => Ok(Self::Post),
            "membership" | "memberships" => Ok(Self::Membership),
            "relationship" | "relationships" => Ok(Self::Relationship),
            other => Err(PopitError::config(format!("Unknown entity type: {}", other))),
        }
    }
}
