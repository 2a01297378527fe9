//! # floem_breakpoints_reactive
//!
//! A small single-threaded reactive runtime: signals that notify the effects
//! that read them, scopes that own signals and effects, and context values
//! that are visible to a scope's subtree.
//!
//! All state lives in a thread local, so signals must only be touched from
//! the thread that created them.

mod batch;
mod context;
mod effect;
mod id;
mod read;
mod runtime;
mod scope;
mod signal;
mod write;

pub use batch::batch;
pub use context::{provide_context, use_context};
pub use effect::{create_effect, untrack};
pub use id::Id as ReactiveId;
pub use read::{SignalGet, SignalWith};
pub use scope::{on_cleanup, with_scope, Scope};
pub use signal::{create_rw_signal, ReadSignal, RwSignal};
pub use write::SignalUpdate;
