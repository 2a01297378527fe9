//! # floem_breakpoints
//! Reactive screen-size breakpoints: which of five named width ranges the
//! window currently falls in, published to every consumer below a provider.
//!
//! ```rust
//! use floem_breakpoints::prelude::*;
//!
//! let viewport = HeadlessViewport::new(1920);
//! let provider = ScreenSizeProvider::new()
//!     .overrides(BreakpointOverrides::new().md(900))
//!     .mount(&viewport);
//!
//! provider.children(|| {
//!     assert_eq!(use_screen_size(), ScreenSize::Xxl);
//! });
//!
//! viewport.resize(850);
//! assert_eq!(provider.screen_size(), ScreenSize::Sm);
//! provider.unmount();
//! ```
//!
//! ## Breakpoints
//! Each screen size starts at a minimum pixel width ([`Breakpoints`]). The
//! defaults are `xxl = 1536`, `xl = 1280`, `lg = 1024`, `md = 768` and, for
//! [`Variant::Current`], `sm = 640`. Overrides replace individual values; a
//! zero override is ignored, use [`Breakpoints::resolve_explicit`] when zero
//! is meant literally.
//!
//! ## Viewports
//! The provider never looks at the window itself. It asks a
//! [`ViewportWatcher`] to watch one width range per screen size and
//! re-derives the screen size whenever one of them flips. Hosts implement the
//! trait on top of their resize events and deliver the flips of one resize
//! inside [`reactive::batch`]; [`HeadlessViewport`] is a manual
//! implementation for tests.

pub mod breakpoints;
pub mod provider;
pub mod screen_size;
pub mod viewport;

pub use breakpoints::{
    BreakpointError, BreakpointOverrides, Breakpoints, UNBOUNDED_MAX, Variant, WidthRange,
};
pub use floem_breakpoints_reactive as reactive;
pub use provider::{
    MountedProvider, ScreenSizeContext, ScreenSizeProvider, ScreenSizeState, use_breakpoints,
    use_screen_size, use_screen_size_context, use_screen_size_state,
};
pub use screen_size::{ScreenSize, SizeFlags, resolve};
pub use viewport::{HeadlessViewport, ViewportWatcher, Watch, WatchCallback};

pub mod prelude {
    pub use crate::breakpoints::{BreakpointOverrides, Breakpoints, Variant};
    pub use crate::provider::{
        ScreenSizeProvider, use_breakpoints, use_screen_size, use_screen_size_state,
    };
    pub use crate::screen_size::ScreenSize;
    pub use crate::viewport::{HeadlessViewport, ViewportWatcher};
    pub use floem_breakpoints_reactive::{
        RwSignal, Scope, SignalGet, SignalUpdate, SignalWith, batch, create_effect,
    };
}
