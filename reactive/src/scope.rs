use std::{any::Any, fmt};

use crate::{
    effect::create_effect,
    id::Id,
    runtime::RUNTIME,
    signal::{create_rw_signal, RwSignal},
};

/// You can manually control Signal's lifetime by using Scope.
/// Every Signal has a Scope created explicitly or implicitly,
/// and when you Dispose the Scope, it will clean up all the Signals
/// that belong to the Scope and all the child Scopes.
///
/// Scopes also form the tree that context lookups walk, see
/// [`use_context`](crate::use_context).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope(pub(crate) Id);

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Scope");
        s.field("id", &self.0);
        s.finish()
    }
}

impl Scope {
    /// Create a new Scope that isn't a child or parent of any scope
    pub fn new() -> Self {
        Self(Id::next())
    }

    /// The current Scope in the Runtime. Any Signal/Effect created with
    /// implicitly Scope will be under this Scope
    pub fn current() -> Scope {
        RUNTIME.with(|runtime| Scope(*runtime.current_scope.borrow()))
    }

    /// Create a child Scope of this Scope
    pub fn create_child(&self) -> Scope {
        let child = Id::next();
        child.set_parent(self.0);
        Scope(child)
    }

    /// The Scope this one was created under, if any.
    pub fn parent(&self) -> Option<Scope> {
        self.0.parent().map(Scope)
    }

    /// Create a RwSignal under this Scope
    pub fn create_rw_signal<T>(self, value: T) -> RwSignal<T>
    where
        T: Any + 'static,
    {
        with_scope(self, || create_rw_signal(value))
    }

    /// Create effect under this Scope
    pub fn create_effect<T>(self, f: impl Fn(Option<T>) -> T + 'static)
    where
        T: Any + 'static,
    {
        with_scope(self, || create_effect(f))
    }

    /// Register a function that runs once, when this Scope is disposed.
    pub fn on_cleanup(&self, f: impl FnOnce() + 'static) {
        RUNTIME.with(|runtime| {
            runtime
                .cleanups
                .borrow_mut()
                .entry(self.0)
                .or_default()
                .push(Box::new(f));
        });
    }

    /// Dispose this Scope, and it will cleanup all the Signals, Effects,
    /// contexts and child Scopes of this Scope.
    pub fn dispose(&self) {
        self.0.dispose();
    }
}

/// Register a cleanup function on the current Scope.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    Scope::current().on_cleanup(f);
}

/// Runs the given code with the given Scope
pub fn with_scope<T>(scope: Scope, f: impl FnOnce() -> T) -> T {
    let prev_scope = RUNTIME.with(|runtime| runtime.current_scope.replace(scope.0));

    let result = f();

    RUNTIME.with(|runtime| {
        *runtime.current_scope.borrow_mut() = prev_scope;
    });

    result
}
