//! Vocabulary URIs used as type tags and relationship predicates.
//!
//! Entity classes come from the W3C `person` and `org` vocabularies,
//! membership links from Popolo's `opengov`, and relationship roles from
//! the Sinar `ocds` and `ownership` namespaces.

/// Predicate of the type-tag edge.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub mod person {
    pub const PERSON: &str = "https://www.w3.org/ns/person#Person";
}

pub mod org {
    pub const ORGANIZATION: &str = "http://www.w3.org/ns/org#Organization";
    pub const POST: &str = "http://www.w3.org/ns/org#Post";
    pub const MEMBERSHIP: &str = "http://www.w3.org/ns/org#Membership";

    pub const MEMBER: &str = "http://www.w3.org/ns/org#member";
    pub const ORGANIZATION_OF: &str = "http://www.w3.org/ns/org#organization";
    pub const POST_IN: &str = "http://www.w3.org/ns/org#postIn";
    pub const SUB_ORGANIZATION_OF: &str = "http://www.w3.org/ns/org#subOrganizationOf";
}

pub mod opengov {
    pub const POST: &str = "http://www.w3.org/ns/opengov#post";
    pub const ON_BEHALF_OF: &str = "http://www.w3.org/ns/opengov#onBehalfOf";
}

pub mod sinar {
    pub const BASE: &str = "https://sinarproject.org/ns/";
    pub const OWNERSHIP: &str = "https://sinarproject.org/ns/ownership#";
    pub const OCDS: &str = "https://sinarproject.org/ns/ocds#";

    pub const OWNERSHIP_OR_CONTROL_STATEMENT: &str = "ownershipOrControlStatement";

    /// OCDS party roles recognised as relationship tokens.
    pub const OCDS_ROLES: &[&str] = &[
        "buyer",
        "procuringEntity",
        "administrativeEntity",
        "tenderer",
        "supplier",
        "funder",
        "reviewBody",
        "interestedParty",
    ];

    /// Type URI of relationship records. Never used as an edge key, unlike
    /// the relationship predicates.
    pub const RELATIONSHIP: &str = "https://sinarproject.org/ns/popit#Relationship";
}

/// Resolve a relationship-type token into its predicate URI.
///
/// Ownership statements live in the ownership namespace; every other token,
/// known OCDS role or not, is placed under the OCDS namespace.
pub fn relationship_predicate(token: &str) -> String {
    if token == sinar::OWNERSHIP_OR_CONTROL_STATEMENT {
        format!("{}{}", sinar::OWNERSHIP, token)
    } else {
        format!("{}{}", sinar::OCDS, token)
    }
}
