use std::any::{Any, TypeId};

use crate::{id::Id, runtime::RUNTIME, scope::Scope};

/// Try to retrieve a stored Context value in the reactive system.
///
/// The lookup starts at the current [`Scope`] and walks up through its
/// parents, so the nearest provider wins and sibling subtrees never see each
/// other's values.
///
/// # Example
/// In a parent component:
/// ```rust
/// # use floem_breakpoints_reactive::provide_context;
/// provide_context(42);
/// provide_context(String::from("Hello world"));
/// ```
///
/// And so in a child component you can retrieve each context data by specifying the type:
/// ```rust
/// # use floem_breakpoints_reactive::use_context;
/// let foo: Option<i32> = use_context();
/// let bar: Option<String> = use_context();
/// ```
pub fn use_context<T>() -> Option<T>
where
    T: Clone + 'static,
{
    let ty = TypeId::of::<T>();
    let mut scope = Some(Scope::current().0);
    while let Some(id) = scope {
        if let Some(value) = lookup::<T>(id, ty) {
            return Some(value);
        }
        scope = id.parent();
    }
    None
}

fn lookup<T: Clone + 'static>(scope: Id, ty: TypeId) -> Option<T> {
    RUNTIME.with(|runtime| {
        runtime
            .contexts
            .borrow()
            .get(&scope)
            .and_then(|values| values.get(&ty))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    })
}

/// Sets a context value on the current [`Scope`].
/// The stored context value can be retrieved from this Scope and any of its
/// descendants by using [use_context](use_context), and is dropped when the
/// Scope is disposed.
pub fn provide_context<T>(value: T)
where
    T: Clone + 'static,
{
    let scope = Scope::current().0;
    RUNTIME.with(|runtime| {
        runtime
            .contexts
            .borrow_mut()
            .entry(scope)
            .or_default()
            .insert(TypeId::of::<T>(), Box::new(value) as Box<dyn Any>);
    });
}
