//! Background driver for the deferred commit.
//!
//! The gate itself never spawns anything: its deferred commit only fires when
//! someone calls `tick()`. `AutoCommitGate` owns a gate together with a
//! worker thread that sleeps until the armed deadline and ticks it. Every
//! public call wakes the worker so it re-reads the deadline.

use crate::engine::{Engine, Rows};
use crate::errors::AppResult;
use crate::gate::{DebouncedTransactionGate, GateStats};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

struct State<E: Engine> {
    gate: DebouncedTransactionGate<E>,
    shutdown: bool,
}

struct Shared<E: Engine> {
    state: Mutex<State<E>>,
    wake: Condvar,
}

impl<E: Engine> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct AutoCommitGate<E: Engine> {
    shared: Arc<Shared<E>>,
    worker: Option<JoinHandle<()>>,
}

impl<E> AutoCommitGate<E>
where
    E: Engine + Send + 'static,
    E::Handle: Send + 'static,
{
    pub fn spawn(gate: DebouncedTransactionGate<E>) -> AppResult<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                gate,
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let for_worker = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("autotx-commit".into())
            .spawn(move || run(for_worker))?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }
}

impl<E: Engine> AutoCommitGate<E> {
    pub fn execute(&self, sql: &str) -> AppResult<Option<Rows>> {
        self.with_gate(|gate| gate.execute(sql))
    }

    pub fn commit(&self) -> AppResult<()> {
        self.with_gate(|gate| gate.commit())
    }

    pub fn rollback(&self) -> AppResult<()> {
        self.with_gate(|gate| gate.rollback())
    }

    pub fn remove(&self) -> AppResult<()> {
        self.with_gate(|gate| gate.remove())
    }

    pub fn stats(&self) -> GateStats {
        self.shared.lock().gate.stats()
    }

    pub fn pending(&self) -> usize {
        self.shared.lock().gate.pending()
    }

    /// Run a closure against the gate while holding the lock.
    pub fn with_gate<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&mut DebouncedTransactionGate<E>) -> T,
    {
        let out = {
            let mut state = self.shared.lock();
            func(&mut state.gate)
        };
        self.shared.wake.notify_all();
        out
    }

    /// Flush, close the engine and stop the worker.
    pub fn close(&mut self) -> AppResult<()> {
        let closed = {
            let mut state = self.shared.lock();
            state.shutdown = true;
            state.gate.close()
        };
        self.stop();
        closed
    }

    fn stop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl<E: Engine> Drop for AutoCommitGate<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<E: Engine>(shared: Arc<Shared<E>>) {
    let mut state = shared.lock();
    loop {
        if state.shutdown {
            break;
        }

        let Some(due) = state.gate.next_deadline() else {
            state = shared
                .wake
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            continue;
        };

        let now = state.gate.now();
        if now >= due {
            if let Err(e) = state.gate.tick() {
                state.gate.log_error(&format!("deferred commit failed: {}", e));
            }
        } else {
            state = shared
                .wake
                .wait_timeout(state, due - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
