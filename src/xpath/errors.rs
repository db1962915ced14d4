use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XPathError {
    #[error("Invalid tokens or characters at index {index} in path '{path}'")]
    InvalidCharacters { index: usize, path: String },

    #[error("Missing path element at end of path")]
    MissingElement,

    #[error("Unknown path element {element}")]
    UnknownElement { element: String },

    #[error("{name} at index {index} isn't a valid token name")]
    InvalidTokenName { name: String, index: usize },

    #[error("{name} at index {index} isn't a valid rule name")]
    InvalidRuleName { name: String, index: usize },
}
