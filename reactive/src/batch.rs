use crate::{effect::run_effect, runtime::RUNTIME};

/// Run `f` with effect runs deferred until it returns.
///
/// Every effect subscribed to a Signal written inside `f` runs once, after
/// `f` finishes, and sees all of the writes together. Nested calls only
/// flush at the outermost one.
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    let already_batching = RUNTIME.with(|runtime| runtime.batching.replace(true));

    let result = f();

    if !already_batching {
        RUNTIME.with(|runtime| runtime.batching.set(false));
        let pending = RUNTIME.with(|runtime| runtime.pending_effects.take());
        for effect in pending {
            run_effect(effect);
        }
    }

    result
}
