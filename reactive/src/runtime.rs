use std::{
    any::{Any, TypeId},
    cell::{Cell, RefCell},
    rc::Rc,
};

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{effect::EffectTrait, id::Id, signal::Signal};

pub(crate) type Cleanup = Box<dyn FnOnce()>;

thread_local! {
    pub(crate) static RUNTIME: Runtime = Runtime::new();
}

/// The internal reactive Runtime which stores all the reactive system states in a
/// thread local
pub(crate) struct Runtime {
    pub(crate) current_effect: RefCell<Option<Rc<dyn EffectTrait>>>,
    pub(crate) current_scope: RefCell<Id>,
    pub(crate) children: RefCell<FxHashMap<Id, FxHashSet<Id>>>,
    pub(crate) parents: RefCell<FxHashMap<Id, Id>>,
    pub(crate) signals: RefCell<FxHashMap<Id, Signal>>,
    pub(crate) effects: RefCell<FxHashMap<Id, Rc<dyn EffectTrait>>>,
    /// Context values keyed by the scope that provided them.
    pub(crate) contexts: RefCell<FxHashMap<Id, FxHashMap<TypeId, Box<dyn Any>>>>,
    pub(crate) cleanups: RefCell<FxHashMap<Id, SmallVec<[Cleanup; 2]>>>,
    pub(crate) batching: Cell<bool>,
    pub(crate) pending_effects: RefCell<SmallVec<[Rc<dyn EffectTrait>; 10]>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub(crate) fn new() -> Self {
        Self {
            current_effect: RefCell::new(None),
            current_scope: RefCell::new(Id::next()),
            children: Default::default(),
            parents: Default::default(),
            signals: Default::default(),
            effects: Default::default(),
            contexts: Default::default(),
            cleanups: Default::default(),
            batching: Cell::new(false),
            pending_effects: RefCell::new(SmallVec::new()),
        }
    }

    pub(crate) fn add_pending_effect(&self, effect: Rc<dyn EffectTrait>) {
        let has_effect = self
            .pending_effects
            .borrow()
            .iter()
            .any(|e| e.id() == effect.id());
        if !has_effect {
            self.pending_effects.borrow_mut().push(effect);
        }
    }

    pub(crate) fn is_live_effect(&self, id: Id) -> bool {
        self.effects.borrow().contains_key(&id)
    }
}
