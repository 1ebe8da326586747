//! In-flight construction records.
//!
//! While one thread runs a constructor, every other caller for the same key parks
//! on that key's [`Construction`] and receives whatever the owner settles it with:
//! the published handle, or the same error the owner saw.

use std::any::Any;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::RegistryError;

/// Type-erased instance as stored in the registry.
pub(crate) type Handle = Arc<dyn Any + Send + Sync>;

enum State {
    Pending,
    Ready(Handle),
    Failed(RegistryError),
}

impl State {
    fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }
}

pub(crate) struct Construction {
    owner: ThreadId,
    state: Mutex<State>,
    settled: Condvar,
}

impl Construction {
    /// Record owned by the calling thread.
    pub(crate) fn new() -> Self {
        Self {
            owner: thread::current().id(),
            state: Mutex::new(State::Pending),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn is_owned_by_current_thread(&self) -> bool {
        self.owner == thread::current().id()
    }

    /// Stores the outcome and wakes every waiter. Only the first call has an effect.
    pub(crate) fn settle(&self, outcome: Result<Handle, RegistryError>) {
        let mut state = self.state.lock();
        if !state.is_pending() {
            return;
        }
        *state = match outcome {
            Ok(handle) => State::Ready(handle),
            Err(err) => State::Failed(err),
        };
        drop(state);
        self.settled.notify_all();
    }

    /// Blocks until the owner settles the record, or until `timeout` elapses.
    pub(crate) fn wait(
        &self,
        type_name: &'static str,
        timeout: Option<Duration>,
    ) -> Result<Handle, RegistryError> {
        let mut state = self.state.lock();
        match timeout {
            None => self.settled.wait_while(&mut state, |s| s.is_pending()),
            Some(limit) => {
                let _ = self
                    .settled
                    .wait_while_for(&mut state, |s| s.is_pending(), limit);
            }
        }

        match &*state {
            State::Ready(handle) => Ok(Arc::clone(handle)),
            State::Failed(err) => Err(err.clone()),
            State::Pending => Err(RegistryError::WaitTimeout {
                type_name,
                waited: timeout.unwrap_or_default(),
            }),
        }
    }
}
