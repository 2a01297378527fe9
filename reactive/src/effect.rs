use std::{any::Any, cell::RefCell, rc::Rc};

use rustc_hash::FxHashSet;

use crate::{
    id::Id,
    runtime::RUNTIME,
    scope::{with_scope, Scope},
};

pub(crate) trait EffectTrait {
    fn id(&self) -> Id;
    fn run(&self);
    fn add_observer(&self, id: Id);
    fn take_observers(&self) -> FxHashSet<Id>;
}

struct Effect<T, F>
where
    T: 'static,
    F: Fn(Option<T>) -> T,
{
    id: Id,
    f: F,
    value: RefCell<Option<T>>,
    observers: RefCell<FxHashSet<Id>>,
}

/// Create an Effect that runs the given function whenever the Signals that subscribed
/// to it in the function change.
///
/// The given function will be run immediately once, and tracks all the signals that
/// subscribed in that run. And when these Signals update, it will rerun the function.
/// The effect re-tracks the signals in each run, so that it will only be re-run
/// by the Signals that actually ran in the last effect run.
///
/// The effect lives as long as the Scope it was created under.
pub fn create_effect<T>(f: impl Fn(Option<T>) -> T + 'static)
where
    T: Any + 'static,
{
    let id = Id::next();
    let effect: Rc<dyn EffectTrait> = Rc::new(Effect {
        id,
        f,
        value: RefCell::new(None),
        observers: Default::default(),
    });
    id.set_scope();
    RUNTIME.with(|runtime| runtime.effects.borrow_mut().insert(id, effect.clone()));

    run_effect(effect);
}

/// Signals that's wrapped this untrack will not subscribe to any effect
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let prev_effect = RUNTIME.with(|runtime| runtime.current_effect.borrow_mut().take());
    let result = f();
    RUNTIME.with(|runtime| {
        *runtime.current_effect.borrow_mut() = prev_effect;
    });
    result
}

pub(crate) fn run_effect(effect: Rc<dyn EffectTrait>) {
    // An earlier effect in the same notification may have disposed this one.
    if !RUNTIME.with(|runtime| runtime.is_live_effect(effect.id())) {
        return;
    }

    // anything created by the previous run belongs to it
    effect.id().dispose_children();

    observer_clean_up(&effect);

    let prev_effect =
        RUNTIME.with(|runtime| runtime.current_effect.borrow_mut().replace(effect.clone()));

    with_scope(Scope(effect.id()), || {
        effect.run();
    });

    RUNTIME.with(|runtime| {
        *runtime.current_effect.borrow_mut() = prev_effect;
    });
}

/// Do a observer clean up at the beginning of each effect run. It clears the effect
/// from all the Signals that this effect subscribes to, and clears all the signals
/// that's stored in this effect, so that the next effect run can re-track signals.
pub(crate) fn observer_clean_up(effect: &Rc<dyn EffectTrait>) {
    let id = effect.id();
    for observer in effect.take_observers() {
        if let Some(signal) = observer.signal() {
            signal.subscribers.borrow_mut().remove(&id);
        }
    }
}

impl<T, F> EffectTrait for Effect<T, F>
where
    T: 'static,
    F: Fn(Option<T>) -> T,
{
    fn id(&self) -> Id {
        self.id
    }

    fn run(&self) {
        let curr_value = self.value.borrow_mut().take();
        let new_value = (self.f)(curr_value);
        *self.value.borrow_mut() = Some(new_value);
    }

    fn add_observer(&self, id: Id) {
        self.observers.borrow_mut().insert(id);
    }

    fn take_observers(&self) -> FxHashSet<Id> {
        std::mem::take(&mut *self.observers.borrow_mut())
    }
}
