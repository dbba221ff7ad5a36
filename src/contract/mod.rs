//! The query/mutate contract shared by the client and the server.
//!
//! Every remote operation is a marker type implementing [`Procedure`]: its
//! dotted path, whether it is a read (`Query`) or a write (`Mutate`), and the
//! typed input and output. Required input fields are enforced by decoding, so
//! a payload missing one is rejected before any handler runs.
//!
//! ```
//! use spacemarks::contract::{spaces, Procedure, ProcedureKind};
//!
//! assert_eq!(spaces::Create::PATH, "spaces.create");
//! assert_eq!(spaces::Create::KIND, ProcedureKind::Mutate);
//!
//! let input: spaces::CreateSpaceInput =
//!     serde_json::from_str(r#"{"id":"s1","name":"Work","order":0}"#).unwrap();
//! assert!(input.icon.is_none());
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Declares a procedure marker type.
macro_rules! procedure {
    ($(#[$meta:meta])* $name:ident, $path:literal, $kind:ident, $input:ty => $output:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::contract::Procedure for $name {
            const PATH: &'static str = $path;
            const KIND: $crate::contract::ProcedureKind = $crate::contract::ProcedureKind::$kind;
            type Input = $input;
            type Output = $output;
        }
    };
}

pub mod bookmarks;
pub mod groups;
pub mod router;
pub mod spaces;
pub mod sync;
mod validate;

pub use router::AppRouter;

/// Capability tag separating side-effect-free reads from writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureKind {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "mutation")]
    Mutate,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutate => "mutation",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote operation declared by the contract.
pub trait Procedure {
    const PATH: &'static str;
    const KIND: ProcedureKind;
    type Input: Serialize + DeserializeOwned;
    type Output: Serialize + DeserializeOwned;
}

/// Identity of the party making a call, as asserted by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    pub subject: String,
}

impl Caller {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Input of procedures that take none. Decodes from `{}`; the RPC layer maps
/// a missing or `null` payload to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoInput {}

/// Input addressing one entity by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByIdInput {
    pub id: String,
}

/// Outcome flag returned by delete and reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessOutput {
    pub success: bool,
}

impl SuccessOutput {
    pub const OK: SuccessOutput = SuccessOutput { success: true };
}

/// Path and kind of a registered procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub kind: ProcedureKind,
}

const fn route_of<P: Procedure>() -> Route {
    Route {
        path: P::PATH,
        kind: P::KIND,
    }
}

/// Every procedure of the contract.
pub const ROUTES: &[Route] = &[
    route_of::<spaces::List>(),
    route_of::<spaces::Create>(),
    route_of::<spaces::Update>(),
    route_of::<spaces::Delete>(),
    route_of::<spaces::Reorder>(),
    route_of::<groups::List>(),
    route_of::<groups::Create>(),
    route_of::<groups::Update>(),
    route_of::<groups::Delete>(),
    route_of::<groups::Reorder>(),
    route_of::<bookmarks::List>(),
    route_of::<bookmarks::Create>(),
    route_of::<bookmarks::Update>(),
    route_of::<bookmarks::Delete>(),
    route_of::<bookmarks::Reorder>(),
    route_of::<bookmarks::Move>(),
    route_of::<sync::EnsureUser>(),
    route_of::<sync::Status>(),
];

/// Looks up a procedure by its dotted path.
pub fn route(path: &str) -> Option<Route> {
    ROUTES.iter().copied().find(|r| r.path == path)
}
