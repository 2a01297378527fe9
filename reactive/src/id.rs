use std::sync::atomic::AtomicU64;

use crate::{effect::observer_clean_up, runtime::RUNTIME, signal::Signal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash)]
/// A stable identifier for a scope, signal or effect.
pub struct Id(u64);

impl Id {
    pub(crate) fn next() -> Id {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Id(COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed))
    }

    pub(crate) fn signal(&self) -> Option<Signal> {
        RUNTIME.with(|runtime| runtime.signals.borrow().get(self).cloned())
    }

    pub(crate) fn add_signal(&self, signal: Signal) {
        RUNTIME.with(|runtime| runtime.signals.borrow_mut().insert(*self, signal));
    }

    pub(crate) fn parent(&self) -> Option<Id> {
        RUNTIME.with(|runtime| runtime.parents.borrow().get(self).copied())
    }

    /// Make this id a child of the current scope, so it is disposed with it.
    pub(crate) fn set_scope(&self) {
        RUNTIME.with(|runtime| {
            let scope = *runtime.current_scope.borrow();
            self.set_parent(scope);
        });
    }

    pub(crate) fn set_parent(&self, parent: Id) {
        RUNTIME.with(|runtime| {
            runtime
                .children
                .borrow_mut()
                .entry(parent)
                .or_default()
                .insert(*self);
            runtime.parents.borrow_mut().insert(*self, parent);
        });
    }

    /// Dispose everything that was created under this id, but keep the id itself alive.
    pub(crate) fn dispose_children(&self) {
        let children = RUNTIME.with(|runtime| runtime.children.borrow_mut().remove(self));
        if let Some(children) = children {
            for child in children {
                child.dispose();
            }
        }
    }

    pub(crate) fn dispose(&self) {
        self.dispose_children();

        let (signal, effect, cleanups) = RUNTIME.with(|runtime| {
            if let Some(parent) = runtime.parents.borrow_mut().remove(self) {
                if let Some(siblings) = runtime.children.borrow_mut().get_mut(&parent) {
                    siblings.remove(self);
                }
            }
            runtime.contexts.borrow_mut().remove(self);
            (
                runtime.signals.borrow_mut().remove(self),
                runtime.effects.borrow_mut().remove(self),
                runtime.cleanups.borrow_mut().remove(self),
            )
        });

        // Runtime borrows are released here, cleanups are free to touch signals.
        if let Some(cleanups) = cleanups {
            for cleanup in cleanups {
                cleanup();
            }
        }

        if let Some(effect) = effect {
            observer_clean_up(&effect);
        }

        drop(signal);
    }
}
