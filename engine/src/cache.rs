//! Single-flight memoization cell.
//!
//! The entity-type cache must guarantee at most one concurrent
//! introspect-and-persist sequence per engine instance: callers arriving
//! during an in-flight load wait for and observe its result instead of
//! starting their own. A bare memoized value cannot express that, so the
//! cell is an explicit three-state machine on a mutex and condvar.

use std::sync::{Condvar, Mutex};

enum State<T> {
    /// Nothing cached, nobody loading.
    Idle,
    /// One caller is computing; others wait on the condvar.
    Loading,
    /// Cached result, served until invalidated.
    Ready(T),
}

/// A three-state single-flight cell.
///
/// `get_or_load` returns the cached value when present, waits when a load
/// is in flight, and otherwise runs the supplied loader itself. On a
/// failed load the error goes to the caller that ran the loader, the cell
/// returns to idle, and any waiting caller retries the load itself — so
/// a transientless error is surfaced once per attempt, never cached.
pub(crate) struct SingleFlight<T> {
    state: Mutex<State<T>>,
    cond: Condvar,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Idle),
            cond: Condvar::new(),
        }
    }

    /// Returns the cached value, loading it with `load` if necessary.
    pub fn get_or_load<E>(&self, load: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut state = self.state.lock().expect("cache mutex poisoned");
        loop {
            match &*state {
                State::Ready(value) => return Ok(value.clone()),
                State::Loading => {
                    state = self.cond.wait(state).expect("cache mutex poisoned");
                }
                State::Idle => break,
            }
        }

        *state = State::Loading;
        drop(state);

        // If the loader panics, restore Idle so waiters do not hang.
        let guard = ResetOnDrop { cell: self };
        let result = load();
        std::mem::forget(guard);

        let mut state = self.state.lock().expect("cache mutex poisoned");
        match result {
            Ok(value) => {
                *state = State::Ready(value.clone());
                self.cond.notify_all();
                Ok(value)
            }
            Err(err) => {
                *state = State::Idle;
                self.cond.notify_all();
                Err(err)
            }
        }
    }

    /// Drops a cached value, forcing the next `get_or_load` to reload.
    ///
    /// An in-flight load is unaffected and still publishes its result.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("cache mutex poisoned");
        if matches!(&*state, State::Ready(_)) {
            *state = State::Idle;
        }
    }
}

struct ResetOnDrop<'a, T> {
    cell: &'a SingleFlight<T>,
}

impl<T> Drop for ResetOnDrop<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.cell.state.lock() {
            *state = State::Idle;
        }
        self.cell.cond.notify_all();
    }
}
