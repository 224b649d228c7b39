use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T, E = ControllerError> = std::result::Result<T, E>;

/// Failure modes of the plant discovery scan
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The discovery location could not be opened. An empty or fully
    /// filtered listing is not a failure, only an unreadable directory is.
    #[error("cannot open plant discovery location {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that propagate out of a dispatch
///
/// Input-shape and routing problems never show up here; they degrade to a
/// `NoOp` outcome instead. Only structural defects propagate.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// A plant is installed on disk but no factory for it was registered.
    /// This indicates a deployment defect, not a user input problem.
    #[error("plant '{identifier}' was discovered but has no registered factory")]
    PlantConstruction { identifier: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
