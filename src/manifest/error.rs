use std::fmt;

/// Structural problem in a manifest, found while building its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// A handler name is not in the registry.
    UnknownHandler {
        name: String,
    },
    /// A mount references a tree that is not declared under `trees`.
    UnknownTree {
        name: String,
    },
    /// A named tree mounts itself, directly or through other named trees.
    CyclicMount {
        /// Mount chain, ending with the repeated tree.
        chain: Vec<String>,
    },
    InvalidMethod {
        method: String,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::UnknownHandler { name } => {
                write!(f, "Manifest error: unknown handler '{}'", name)
            }
            ManifestError::UnknownTree { name } => {
                write!(
                    f,
                    "Manifest error: mount references undeclared tree '{}'",
                    name
                )
            }
            ManifestError::CyclicMount { chain } => {
                write!(f, "Manifest error: cyclic mount {}", chain.join(" -> "))
            }
            ManifestError::InvalidMethod { method } => {
                write!(
                    f,
                    "Manifest error: invalid HTTP method '{}'. \
                    Expected one of GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS, TRACE",
                    method
                )
            }
        }
    }
}

impl std::error::Error for ManifestError {}
