use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Shared error source, so one constructor failure can be handed to every waiter.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// The constructor returned an error. The slot stays empty and may be retried.
    #[error("construction of {type_name} failed: {source}")]
    ConstructionFailed {
        type_name: &'static str,
        #[source]
        source: SharedError,
    },

    /// The constructor panicked. The panic itself continues on the constructing thread.
    #[error("construction of {type_name} panicked")]
    ConstructionPanicked { type_name: &'static str },

    /// The constructor for a type asked for that same type on the same thread.
    #[error("re-entrant construction of {type_name} on the constructing thread")]
    ReentrantConstruction { type_name: &'static str },

    /// A blocked caller gave up waiting on another thread's construction.
    #[error("timed out after {waited:?} waiting for {type_name} to be constructed")]
    WaitTimeout {
        type_name: &'static str,
        waited: Duration,
    },

    #[error("type not found in registry: {type_name}")]
    TypeNotFound { type_name: &'static str },

    #[error("type mismatch in registry for type: {type_name}")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    pub(crate) fn construction_failed(
        type_name: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        RegistryError::ConstructionFailed {
            type_name,
            source: Arc::from(source.into()),
        }
    }

    /// Name of the logical type the error concerns.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryError::ConstructionFailed { type_name, .. }
            | RegistryError::ConstructionPanicked { type_name }
            | RegistryError::ReentrantConstruction { type_name }
            | RegistryError::WaitTimeout { type_name, .. }
            | RegistryError::TypeNotFound { type_name }
            | RegistryError::TypeMismatch { type_name } => type_name,
        }
    }
}
