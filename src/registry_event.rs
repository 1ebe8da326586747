use crate::ExecutionContextId;

/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use process_singleton::RegistryEvent;
///
/// let event = RegistryEvent::Hit { type_name: "i32" };
/// assert_eq!(event.to_string(), "hit { type_name: i32 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// An existing instance satisfied a `get_or_create` call.
    Hit { type_name: &'static str },

    /// The calling thread won the race and is about to run the constructor.
    Construct {
        type_name: &'static str,
        context: ExecutionContextId,
    },

    /// The calling thread found a construction in flight and is about to block on it.
    Wait { type_name: &'static str },

    /// The constructor returned an error; the slot was left empty.
    ///
    /// Not emitted for a panicking constructor: waiters see
    /// [`RegistryError::ConstructionPanicked`](crate::RegistryError::ConstructionPanicked) instead.
    ConstructionFailed { type_name: &'static str },

    /// A plain lookup was performed.
    Get {
        type_name: &'static str,
        found: bool,
    },

    /// A type existence check was performed.
    Contains {
        type_name: &'static str,
        found: bool,
    },

    /// Every entry was cleared.
    Reset { removed: usize },

    /// Entries of one logical type were cleared across all execution contexts.
    ResetType {
        type_name: &'static str,
        removed: usize,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Hit { type_name } => write!(f, "hit {{ type_name: {type_name} }}"),
            RegistryEvent::Construct { type_name, context } => {
                write!(f, "construct {{ type_name: {type_name}, context: {context} }}")
            }
            RegistryEvent::Wait { type_name } => write!(f, "wait {{ type_name: {type_name} }}"),
            RegistryEvent::ConstructionFailed { type_name } => {
                write!(f, "construction failed {{ type_name: {type_name} }}")
            }
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Reset { removed } => write!(f, "reset {{ removed: {removed} }}"),
            RegistryEvent::ResetType { type_name, removed } => {
                write!(
                    f,
                    "reset type {{ type_name: {type_name}, removed: {removed} }}"
                )
            }
        }
    }
}
