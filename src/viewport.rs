//! The width-watching capability the provider depends on.
//!
//! A host implements [`ViewportWatcher`] on top of whatever tells it about
//! window resizes. [`HeadlessViewport`] is an in-process implementation for
//! tests and for hosts without a real window.
//!
//! One resize usually flips two watches, one range stops matching and its
//! neighbour starts. Hosts deliver all flips of one resize inside
//! [`batch`](crate::reactive::batch), so listeners recompute once, after
//! every flag is up to date. Outside a batch each flip is seen on its own and
//! a listener may briefly observe neither or both ranges matching.

use std::{cell::RefCell, fmt, rc::Rc};

use floem_breakpoints_reactive::batch;
use smallvec::SmallVec;
use tracing::trace;

use crate::breakpoints::WidthRange;

/// Callback invoked with the new truth value of a watched range.
pub type WatchCallback = Box<dyn Fn(bool)>;

/// Something that can tell whether the viewport width lies in a range, and
/// report when that stops or starts being true.
pub trait ViewportWatcher {
    /// Start watching `range`. `on_change` must only be called when the
    /// truth value flips, never with the value already reported. All flips
    /// caused by one width change should be delivered inside a single
    /// [`batch`](crate::reactive::batch).
    fn watch(&self, range: WidthRange, on_change: WatchCallback) -> Watch;
}

/// A live registration with a [`ViewportWatcher`].
///
/// Dropping it, or calling [`Watch::release`], unregisters the callback.
#[must_use = "dropping a Watch unregisters it"]
pub struct Watch {
    matches: bool,
    release: Option<Box<dyn FnOnce()>>,
}

impl Watch {
    pub fn new(matches: bool, release: impl FnOnce() + 'static) -> Self {
        Self {
            matches,
            release: Some(Box::new(release)),
        }
    }

    /// Whether the range matched when the watch was registered.
    pub fn matches(&self) -> bool {
        self.matches
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("matches", &self.matches)
            .field("released", &self.release.is_none())
            .finish()
    }
}

struct WatchEntry {
    id: u64,
    range: WidthRange,
    matches: bool,
    on_change: Rc<dyn Fn(bool)>,
}

#[derive(Default)]
struct ViewportState {
    width: u32,
    next_id: u64,
    watches: SmallVec<[WatchEntry; 5]>,
}

/// A viewport whose width is set by hand.
///
/// Cloning gives another handle to the same viewport.
///
/// [`HeadlessViewport::resize`] notifies flipped watches in registration
/// order, all inside one [`batch`].
#[derive(Clone, Default)]
pub struct HeadlessViewport {
    state: Rc<RefCell<ViewportState>>,
}

impl HeadlessViewport {
    pub fn new(width: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewportState {
                width,
                ..Default::default()
            })),
        }
    }

    pub fn width(&self) -> u32 {
        self.state.borrow().width
    }

    /// Number of watches that haven't been released.
    pub fn active_watches(&self) -> usize {
        self.state.borrow().watches.len()
    }

    /// Change the width and notify the watches whose truth value flipped.
    /// Returns the number of notifications sent.
    pub fn resize(&self, width: u32) -> usize {
        let flipped = {
            let mut state = self.state.borrow_mut();
            state.width = width;
            let mut flipped: SmallVec<[(Rc<dyn Fn(bool)>, bool); 5]> = SmallVec::new();
            for entry in state.watches.iter_mut() {
                let matches = entry.range.contains(width);
                if matches == entry.matches {
                    continue;
                }
                entry.matches = matches;
                trace!(id = entry.id, width, matches, "viewport watch flipped");
                flipped.push((entry.on_change.clone(), matches));
            }
            flipped
        };

        // The state borrow is released, callbacks may register or release watches.
        batch(|| {
            for (on_change, matches) in &flipped {
                on_change(*matches);
            }
        });
        flipped.len()
    }
}

impl ViewportWatcher for HeadlessViewport {
    fn watch(&self, range: WidthRange, on_change: WatchCallback) -> Watch {
        let (id, matches) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let matches = range.contains(state.width);
            state.watches.push(WatchEntry {
                id,
                range,
                matches,
                on_change: Rc::from(on_change),
            });
            (id, matches)
        };

        let state = Rc::downgrade(&self.state);
        Watch::new(matches, move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().watches.retain(|entry| entry.id != id);
            }
        })
    }
}

impl fmt::Debug for HeadlessViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessViewport")
            .field("width", &state.width)
            .field("watches", &state.watches.len())
            .finish()
    }
}
