//! End-to-end tests for the screen size provider.
//!
//! Each test drives a `HeadlessViewport` and observes the provider either
//! directly or through consumer effects mounted in its subtree.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use floem_breakpoints::prelude::*;
use floem_breakpoints::{
    MountedProvider, ScreenSizeState, Watch, WatchCallback, WidthRange, use_screen_size_context,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mount an effect in the provider's subtree that records every value it sees.
fn record(provider: &MountedProvider) -> Rc<RefCell<Vec<ScreenSize>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    provider.children(|| {
        let seen = seen.clone();
        create_effect(move |_| seen.borrow_mut().push(use_screen_size()));
    });
    seen
}

#[test]
fn wide_window_is_xxl() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::new().mount(&viewport);

    assert_eq!(provider.children(use_screen_size), ScreenSize::Xxl);
    provider.unmount();
}

#[test]
fn tablet_window_is_md() {
    init_tracing();
    let viewport = HeadlessViewport::new(800);
    let provider = ScreenSizeProvider::new().mount(&viewport);

    assert_eq!(provider.children(use_screen_size), ScreenSize::Md);
    provider.unmount();
}

#[test]
fn overridden_md_moves_range() {
    init_tracing();
    let viewport = HeadlessViewport::new(850);
    let provider = ScreenSizeProvider::new()
        .overrides(BreakpointOverrides::new().md(900))
        .mount(&viewport);

    assert_eq!(provider.children(use_screen_size), ScreenSize::Sm);
    assert_eq!(provider.breakpoints().md, 900);

    viewport.resize(950);
    assert_eq!(provider.children(use_screen_size), ScreenSize::Md);
    provider.unmount();
}

#[test]
fn shrinking_publishes_once() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::legacy().mount(&viewport);
    let seen = record(&provider);
    let recomputed = provider.recomputations();
    let published = provider.context().version();

    assert_eq!(*seen.borrow(), vec![ScreenSize::Xxl]);

    // xxl stops matching, sm starts matching, one batch
    assert_eq!(viewport.resize(500), 2);
    assert_eq!(provider.recomputations(), recomputed + 1);
    assert_eq!(provider.context().version(), published + 1);
    assert_eq!(*seen.borrow(), vec![ScreenSize::Xxl, ScreenSize::Sm]);
    assert_eq!(provider.screen_size(), ScreenSize::Sm);
    provider.unmount();
}

#[test]
fn shrinking_below_sm_threshold() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::new().mount(&viewport);
    let seen = record(&provider);
    let recomputed = provider.recomputations();

    // 500 is below the current sm threshold, so only the xxl watch flips
    assert_eq!(viewport.resize(500), 1);
    assert_eq!(provider.recomputations(), recomputed + 1);
    assert_eq!(*seen.borrow(), vec![ScreenSize::Xxl, ScreenSize::Sm]);
    provider.unmount();
}

#[test]
fn every_step_down_is_published_once() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::legacy().mount(&viewport);
    let seen = record(&provider);

    for width in [1400, 1100, 800, 300, 800, 1100, 1400, 1920] {
        viewport.resize(width);
    }

    assert_eq!(
        *seen.borrow(),
        vec![
            ScreenSize::Xxl,
            ScreenSize::Xl,
            ScreenSize::Lg,
            ScreenSize::Md,
            ScreenSize::Sm,
            ScreenSize::Md,
            ScreenSize::Lg,
            ScreenSize::Xl,
            ScreenSize::Xxl,
        ]
    );
    provider.unmount();
}

#[test]
fn resize_within_range_is_silent() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::new().mount(&viewport);
    let seen = record(&provider);
    let recomputed = provider.recomputations();
    let published = provider.context().version();

    assert_eq!(viewport.resize(1800), 0);
    assert_eq!(viewport.resize(1920), 0);

    assert_eq!(provider.recomputations(), recomputed);
    assert_eq!(provider.context().version(), published);
    assert_eq!(seen.borrow().len(), 1);
    provider.unmount();
}

#[test]
fn accessor_outside_provider_is_default() {
    init_tracing();
    let outside = Scope::new();
    assert_eq!(
        with_scope_of(outside, use_screen_size_state),
        ScreenSizeState::default()
    );
    assert_eq!(with_scope_of(outside, use_screen_size), ScreenSize::Sm);
    assert_eq!(with_scope_of(outside, use_breakpoints), None);
    assert!(with_scope_of(outside, use_screen_size_context).is_none());
}

fn with_scope_of<T>(scope: Scope, f: impl FnOnce() -> T) -> T {
    floem_breakpoints::reactive::with_scope(scope, f)
}

#[test]
fn unmount_releases_watches() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::new().mount(&viewport);
    assert_eq!(viewport.active_watches(), 5);

    let seen = record(&provider);
    let scope = provider.scope();
    provider.unmount();

    assert_eq!(viewport.active_watches(), 0);
    assert_eq!(viewport.resize(500), 0);
    assert_eq!(*seen.borrow(), vec![ScreenSize::Xxl]);
    assert_eq!(with_scope_of(scope, use_screen_size), ScreenSize::Sm);
}

#[test]
fn nested_providers_are_independent() {
    init_tracing();
    let viewport = HeadlessViewport::new(850);
    let outer = ScreenSizeProvider::new().mount(&viewport);
    let inner = outer.children(|| {
        ScreenSizeProvider::new()
            .overrides(BreakpointOverrides::new().md(900))
            .mount(&viewport)
    });
    assert_eq!(viewport.active_watches(), 10);

    assert_eq!(outer.children(use_screen_size), ScreenSize::Md);
    assert_eq!(inner.children(use_screen_size), ScreenSize::Sm);
    assert_eq!(inner.children(use_breakpoints).map(|b| b.md), Some(900));

    inner.unmount();
    assert_eq!(viewport.active_watches(), 5);

    viewport.resize(1100);
    assert_eq!(outer.children(use_screen_size), ScreenSize::Lg);
    outer.unmount();
}

#[test]
fn legacy_and_current_publish_different_shapes() {
    init_tracing();
    let viewport = HeadlessViewport::new(1300);
    let legacy = ScreenSizeProvider::legacy().mount(&viewport);
    let current = ScreenSizeProvider::new().mount(&viewport);

    assert_eq!(legacy.children(use_breakpoints), None);
    assert_eq!(
        current.children(use_breakpoints),
        Some(Breakpoints::CURRENT)
    );
    assert_eq!(legacy.screen_size(), current.screen_size());

    legacy.unmount();
    current.unmount();
}

#[test]
fn consumer_signal_follows_screen_size() {
    init_tracing();
    let viewport = HeadlessViewport::new(1100);
    let provider = ScreenSizeProvider::new().mount(&viewport);
    let columns = RwSignal::new(0);

    provider.children(|| {
        create_effect(move |_| {
            let cols = match use_screen_size() {
                ScreenSize::Xxl | ScreenSize::Xl => 4,
                ScreenSize::Lg => 3,
                ScreenSize::Md => 2,
                ScreenSize::Sm => 1,
            };
            columns.set(cols);
        });
    });
    assert_eq!(columns.get_untracked(), 3);

    viewport.resize(700);
    assert_eq!(columns.get_untracked(), 1);
    provider.unmount();
}

#[test]
fn disposed_consumer_never_sees_a_stale_size() {
    init_tracing();
    let viewport = HeadlessViewport::new(1920);
    let provider = ScreenSizeProvider::legacy().mount(&viewport);
    let sibling = provider.children(Scope::current).create_child();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for _ in 0..8 {
        floem_breakpoints::reactive::with_scope(sibling, || {
            let seen = seen.clone();
            create_effect(move |_| seen.borrow_mut().push(use_screen_size()));
        });
    }
    provider.children(|| {
        create_effect(move |_| {
            if use_screen_size() == ScreenSize::Md {
                sibling.dispose();
            }
        })
    });

    viewport.resize(800);

    assert_eq!(provider.screen_size(), ScreenSize::Md);
    assert!(
        !seen.borrow().contains(&ScreenSize::Sm),
        "consumer saw a size that was never published: {:?}",
        seen.borrow()
    );
    provider.unmount();
}

struct Entry {
    id: u64,
    range: WidthRange,
    matches: bool,
    on_change: Rc<dyn Fn(bool)>,
}

/// A second `ViewportWatcher` that fires flips in plain registration order,
/// the way a host's resize loop would.
#[derive(Clone, Default)]
struct ResizeLoop {
    width: Rc<RefCell<u32>>,
    next_id: Rc<Cell<u64>>,
    entries: Rc<RefCell<Vec<Entry>>>,
}

impl ResizeLoop {
    fn new(width: u32) -> Self {
        let this = Self::default();
        *this.width.borrow_mut() = width;
        this
    }

    fn flips(&self, width: u32) -> Vec<(Rc<dyn Fn(bool)>, bool)> {
        *self.width.borrow_mut() = width;
        let mut flips = Vec::new();
        for entry in self.entries.borrow_mut().iter_mut() {
            let matches = entry.range.contains(width);
            if matches != entry.matches {
                entry.matches = matches;
                flips.push((entry.on_change.clone(), matches));
            }
        }
        flips
    }

    fn resize(&self, width: u32) {
        let flips = self.flips(width);
        batch(|| {
            for (on_change, matches) in flips {
                on_change(matches);
            }
        });
    }

    fn resize_unbatched(&self, width: u32) {
        for (on_change, matches) in self.flips(width) {
            on_change(matches);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl ViewportWatcher for ResizeLoop {
    fn watch(&self, range: WidthRange, on_change: WatchCallback) -> Watch {
        let id = self.next_id.replace(self.next_id.get() + 1);
        let matches = range.contains(*self.width.borrow());
        self.entries.borrow_mut().push(Entry {
            id,
            range,
            matches,
            on_change: Rc::from(on_change),
        });

        let entries = Rc::downgrade(&self.entries);
        Watch::new(matches, move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|e| e.id != id);
            }
        })
    }
}

#[test]
fn registration_order_watcher_publishes_once_per_resize() {
    init_tracing();
    let watcher = ResizeLoop::new(1100);
    let provider = ScreenSizeProvider::new().mount(&watcher);
    let seen = record(&provider);
    let published = provider.context().version();

    // lg is registered before md, so it reports leaving first
    watcher.resize(800);
    assert_eq!(*seen.borrow(), vec![ScreenSize::Lg, ScreenSize::Md]);
    assert_eq!(provider.context().version(), published + 1);

    watcher.resize(1100);
    assert_eq!(
        *seen.borrow(),
        vec![ScreenSize::Lg, ScreenSize::Md, ScreenSize::Lg]
    );

    provider.unmount();
    assert_eq!(watcher.len(), 0);
}

#[test]
fn unbatched_watcher_settles_on_final_size() {
    init_tracing();
    let watcher = ResizeLoop::new(1100);
    let provider = ScreenSizeProvider::new().mount(&watcher);
    let seen = record(&provider);

    watcher.resize_unbatched(800);
    assert_eq!(provider.screen_size(), ScreenSize::Md);
    assert_eq!(seen.borrow().last(), Some(&ScreenSize::Md));

    watcher.resize_unbatched(1920);
    assert_eq!(provider.children(use_screen_size), ScreenSize::Xxl);
    provider.unmount();
}
