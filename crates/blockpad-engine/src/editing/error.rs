use thiserror::Error;

use crate::editing::NodeId;

/// Why an edit was refused
///
/// Every variant is recoverable: the document is left exactly as it was, with
/// no history entry and no version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node {0} is not in the document")]
    NodeNotFound(NodeId),

    #[error("node {0} is the first node and has no predecessor")]
    NoPrevious(NodeId),

    #[error("node {0} is the last node and has no successor")]
    NoNext(NodeId),

    #[error("node {0} cannot be merged with itself")]
    SelfMerge(NodeId),
}
