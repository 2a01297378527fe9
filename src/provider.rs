//! Publishes the current [`ScreenSize`] to a subtree of the reactive scope tree.
//!
//! Mounting a [`ScreenSizeProvider`] registers one width watch per screen
//! size and provides a [`ScreenSizeContext`] in a fresh child scope. Code
//! run inside that scope reads the value with [`use_screen_size`]; reads
//! made inside an effect re-run the effect whenever the value changes.
//!
//! ```rust
//! use floem_breakpoints::{HeadlessViewport, ScreenSize, ScreenSizeProvider, use_screen_size};
//!
//! let viewport = HeadlessViewport::new(1920);
//! let provider = ScreenSizeProvider::new().mount(&viewport);
//! assert_eq!(provider.children(use_screen_size), ScreenSize::Xxl);
//!
//! viewport.resize(800);
//! assert_eq!(provider.children(use_screen_size), ScreenSize::Md);
//! provider.unmount();
//! ```

use std::{cell::Cell, rc::Rc};

use floem_breakpoints_reactive::{
    ReadSignal, RwSignal, Scope, SignalGet, SignalUpdate, SignalWith, provide_context,
    use_context, with_scope,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    breakpoints::{BreakpointOverrides, Breakpoints, Variant},
    screen_size::{ScreenSize, SizeFlags, resolve},
    viewport::{ViewportWatcher, Watch},
};

/// The value a provider publishes.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenSizeState {
    pub screen_size: ScreenSize,
    /// The thresholds in effect, only published by [`Variant::Current`].
    pub breakpoints: Option<Breakpoints>,
}

/// Read handle to the nearest provider's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSizeContext {
    state: ReadSignal<ScreenSizeState>,
}

impl ScreenSizeContext {
    /// The published state, or the default once the provider is unmounted.
    pub fn state(&self) -> ScreenSizeState {
        self.state.try_get().unwrap_or_default()
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.state().screen_size
    }

    pub fn breakpoints(&self) -> Option<Breakpoints> {
        self.state().breakpoints
    }

    /// Number of times a new value has been published.
    pub fn version(&self) -> u64 {
        self.state.version()
    }
}

/// Configuration for a screen size provider. Thresholds are resolved once,
/// when [`ScreenSizeProvider::mount`] is called; changing them means
/// mounting a new provider.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSizeProvider {
    variant: Variant,
    overrides: BreakpointOverrides,
}

impl ScreenSizeProvider {
    /// A provider using the current defaults, `sm` threshold included.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with the legacy defaults, publishing only the screen size.
    pub fn legacy() -> Self {
        Self::new().variant(Variant::Legacy)
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn overrides(mut self, overrides: BreakpointOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve the thresholds, register the width watches and start
    /// publishing under a child of the current scope.
    pub fn mount(&self, watcher: &dyn ViewportWatcher) -> MountedProvider {
        let variant = self.variant;
        let breakpoints = Breakpoints::resolve(variant, &self.overrides);
        let scope = Scope::current().create_child();

        let state = scope.create_rw_signal(ScreenSizeState {
            screen_size: ScreenSize::Sm,
            breakpoints: variant.publishes_breakpoints().then_some(breakpoints),
        });
        let flags = scope.create_rw_signal(SizeFlags::empty());

        let mut initial = SizeFlags::empty();
        let mut watches: SmallVec<[Watch; 5]> = SmallVec::new();
        for (size, range) in breakpoints.ranges() {
            let watch = watcher.watch(
                range,
                Box::new(move |matches: bool| {
                    trace!(%size, matches, "screen size watch changed");
                    flags.update(|flags| flags.set(size.flag(), matches));
                }),
            );
            initial.set(size.flag(), watch.matches());
            watches.push(watch);
        }
        flags.set(initial);

        scope.on_cleanup(move || {
            debug!(watches = watches.len(), "releasing screen size watches");
            drop(watches);
        });

        let recomputations = Rc::new(Cell::new(0));
        scope.create_effect({
            let recomputations = recomputations.clone();
            move |_| {
                let flags = flags.get();
                let screen_size = resolve(flags);
                recomputations.set(recomputations.get() + 1);
                trace!(?flags, %screen_size, "screen size recomputed");

                let prev = state.get_untracked();
                if state.set_if_changed(ScreenSizeState {
                    screen_size,
                    ..prev
                }) {
                    debug!(from = %prev.screen_size, to = %screen_size, "screen size changed");
                }
            }
        });

        with_scope(scope, || {
            provide_context(ScreenSizeContext {
                state: state.read_only(),
            })
        });

        debug!(?variant, ?breakpoints, screen_size = %state.get_untracked().screen_size, "screen size provider mounted");

        MountedProvider {
            scope,
            state,
            breakpoints,
            recomputations,
        }
    }
}

/// A live provider. Its watches stay registered until [`MountedProvider::unmount`].
#[derive(Debug)]
#[must_use = "call unmount() to release the watches"]
pub struct MountedProvider {
    scope: Scope,
    state: RwSignal<ScreenSizeState>,
    breakpoints: Breakpoints,
    recomputations: Rc<Cell<u64>>,
}

impl MountedProvider {
    /// Run `f` inside this provider's subtree, where the accessors see it.
    pub fn children<T>(&self, f: impl FnOnce() -> T) -> T {
        with_scope(self.scope, f)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn context(&self) -> ScreenSizeContext {
        ScreenSizeContext {
            state: self.state.read_only(),
        }
    }

    pub fn state(&self) -> ScreenSizeState {
        self.context().state()
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.state().screen_size
    }

    /// The thresholds captured at mount, whichever variant is published.
    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// How many times the screen size has been re-derived from the watches.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    /// Release the watches and drop the published state.
    pub fn unmount(self) {
        debug!("screen size provider unmounted");
        self.scope.dispose();
    }
}

/// The nearest provider's context, if the current scope is inside one.
pub fn use_screen_size_context() -> Option<ScreenSizeContext> {
    use_context::<ScreenSizeContext>()
}

/// The nearest provider's state, or the default outside any provider.
pub fn use_screen_size_state() -> ScreenSizeState {
    use_screen_size_context()
        .map(|cx| cx.state())
        .unwrap_or_default()
}

/// The nearest provider's screen size, [`ScreenSize::Sm`] outside any provider.
pub fn use_screen_size() -> ScreenSize {
    use_screen_size_state().screen_size
}

/// The effective thresholds, when the nearest provider publishes them.
pub fn use_breakpoints() -> Option<Breakpoints> {
    use_screen_size_state().breakpoints
}
