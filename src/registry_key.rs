//! Composite keys identifying one singleton slot.
//!
//! A slot is addressed by the current execution context (the OS process) and the
//! logical type requesting singleton semantics. The process id is read on every
//! lookup, never cached, so a forked child that inherited the parent's map can
//! never hit the parent's entries.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies the running OS process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionContextId(u32);

impl ExecutionContextId {
    /// Id of the calling process, re-derived on every call.
    #[must_use]
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// Wraps a raw process id.
    #[must_use]
    pub const fn from_raw(pid: u32) -> Self {
        Self(pid)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExecutionContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid:{}", self.0)
    }
}

/// `(execution context, logical type)` pair under which at most one instance is stored.
///
/// Identity is the `TypeId`, not the display name: two distinct types produced by the
/// same generic template (`Pool<A>` and `Pool<B>`) never share a slot.
#[derive(Debug, Clone, Copy)]
pub struct RegistryKey {
    context: ExecutionContextId,
    type_id: TypeId,
    type_name: &'static str,
}

impl RegistryKey {
    /// Key for `T` in the calling process.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self::in_context::<T>(ExecutionContextId::current())
    }

    /// Key for `T` in an explicit execution context.
    #[must_use]
    pub fn in_context<T: 'static>(context: ExecutionContextId) -> Self {
        Self {
            context,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn context(&self) -> ExecutionContextId {
        self.context
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Diagnostic name of the logical type. Not part of the key's identity.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for RegistryKey {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.type_id == other.type_id
    }
}

impl Eq for RegistryKey {}

impl Hash for RegistryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.hash(state);
        self.type_id.hash(state);
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.type_name, self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Template<T>(T);
    struct Left;
    struct Right;

    #[test]
    fn test_current_context_matches_process_id() {
        assert_eq!(ExecutionContextId::current().as_raw(), std::process::id());
    }

    #[test]
    fn test_same_type_same_key() {
        assert_eq!(RegistryKey::of::<u32>(), RegistryKey::of::<u32>());
    }

    #[test]
    fn test_template_instantiations_do_not_collide() {
        let left = RegistryKey::of::<Template<Left>>();
        let right = RegistryKey::of::<Template<Right>>();
        assert_ne!(left, right);

        let keys: HashSet<_> = [left, right].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_context_is_part_of_identity() {
        let here = RegistryKey::of::<String>();
        let elsewhere = RegistryKey::in_context::<String>(ExecutionContextId::from_raw(
            std::process::id().wrapping_add(1),
        ));
        assert_ne!(here, elsewhere);
        assert_eq!(here.type_id(), elsewhere.type_id());
    }

    #[test]
    fn test_display() {
        let key = RegistryKey::in_context::<u8>(ExecutionContextId::from_raw(7));
        assert_eq!(key.to_string(), "u8@pid:7");
    }
}
