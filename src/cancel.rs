//! Hierarchical cancellation signal
//!
//! A [`CancelHandle`] owns the trigger; any number of [`CancelSignal`] clones
//! can observe it from other threads. A child signal derived from a parent
//! reports cancelled as soon as either fires, but cancelling the child never
//! touches the parent.
//!
//! The flags are plain atomics, so observers never block and need no lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Node {
    cancelled: AtomicBool,
    parent: Option<Arc<Node>>,
}

impl Node {
    fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        let mut next = self.parent.as_deref();
        while let Some(node) = next {
            if node.cancelled.load(Ordering::Acquire) {
                return true;
            }
            next = node.parent.as_deref();
        }
        false
    }
}

/// Read-only view of a cancellation signal
#[derive(Debug, Clone)]
pub struct CancelSignal {
    node: Arc<Node>,
}

impl CancelSignal {
    /// Whether this signal or any ancestor has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.node.is_cancelled()
    }

    /// Derive a new child handle whose signal follows this one
    pub fn child(&self) -> CancelHandle {
        CancelHandle {
            node: Arc::new(Node {
                cancelled: AtomicBool::new(false),
                parent: Some(Arc::clone(&self.node)),
            }),
        }
    }
}

/// Owner of a cancellation trigger
#[derive(Debug, Default)]
pub struct CancelHandle {
    node: Arc<Node>,
}

impl CancelHandle {
    /// Create a root handle with no parent
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that is also cancelled when `parent` is
    pub fn with_parent(parent: &CancelSignal) -> Self {
        parent.child()
    }

    /// Trigger cancellation.
    ///
    /// Returns `true` only for the call that actually flipped the flag;
    /// later calls are no-ops.
    pub fn cancel(&self) -> bool {
        !self.node.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Whether this handle or any ancestor has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.node.is_cancelled()
    }

    /// Read-only signal for collaborators
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            node: Arc::clone(&self.node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(handle.is_cancelled());
        assert!(handle.signal().is_cancelled());
    }

    #[test]
    fn test_parent_cancels_child() {
        let root = CancelHandle::new();
        let child = CancelHandle::with_parent(&root.signal());
        let grandchild = child.signal().child();

        assert!(!grandchild.is_cancelled());
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_never_cancels_parent() {
        let root = CancelHandle::new();
        let child = root.signal().child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_signal_observable_from_other_threads() {
        let handle = CancelHandle::new();
        let observers: Vec<_> = (0..4)
            .map(|_| {
                let signal = handle.signal();
                thread::spawn(move || {
                    while !signal.is_cancelled() {
                        thread::yield_now();
                    }
                    true
                })
            })
            .collect();

        handle.cancel();
        for observer in observers {
            assert!(observer.join().unwrap());
        }
    }
}
