use std::fmt;

///
/// ConsistencyLevel
///
/// Replication acknowledgment requirement applied to a single wire call.
/// Interpreted by the store, not by this layer.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    LocalQuorum,
    EachQuorum,
    All,
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Any => "any",
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Quorum => "quorum",
            Self::LocalQuorum => "local_quorum",
            Self::EachQuorum => "each_quorum",
            Self::All => "all",
        };
        write!(f, "{label}")
    }
}

///
/// OperationKind
/// Read/write classification used to resolve a consistency level.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Read,
    Write,
}

///
/// ConsistencyPolicy
///
/// Process-wide policy mapping operation kind to a consistency level.
/// Resolved at call time for every operation, never cached per instance.
///

pub trait ConsistencyPolicy {
    fn resolve(&self, kind: OperationKind) -> ConsistencyLevel;
}

///
/// QuorumPolicy
/// Default policy: quorum reads and writes.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct QuorumPolicy;

impl ConsistencyPolicy for QuorumPolicy {
    fn resolve(&self, _kind: OperationKind) -> ConsistencyLevel {
        ConsistencyLevel::Quorum
    }
}

///
/// OnePolicy
/// Single-replica acknowledgment for both kinds.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct OnePolicy;

impl ConsistencyPolicy for OnePolicy {
    fn resolve(&self, _kind: OperationKind) -> ConsistencyLevel {
        ConsistencyLevel::One
    }
}

///
/// TESTS
///
