use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {id} does not exist in this tree")]
    UnknownNode { id: usize },

    #[error("node {id} already has a parent")]
    AlreadyAttached { id: usize },

    #[error("node {id} cannot be the root: it already has a parent")]
    RootHasParent { id: usize },

    #[error("tree exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },
}
