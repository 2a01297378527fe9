//! Named pixel-width thresholds and the ranges derived from them.

use crate::screen_size::{ScreenSize, SizeFlags, resolve};

/// Upper bound of the `xxl` range. Larger than any real viewport width.
pub const UNBOUNDED_MAX: u32 = u32::MAX;

/// Which flavour of the breakpoint table to use.
///
/// `Legacy` has no `sm` threshold and publishes only the screen size.
/// `Current` adds `sm = 640` and publishes the effective table too.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variant {
    Legacy,
    #[default]
    Current,
}

impl Variant {
    pub const fn defaults(self) -> Breakpoints {
        match self {
            Variant::Legacy => Breakpoints::LEGACY,
            Variant::Current => Breakpoints::CURRENT,
        }
    }

    /// Whether the published state carries the effective breakpoints.
    pub const fn publishes_breakpoints(self) -> bool {
        matches!(self, Variant::Current)
    }
}

/// An inclusive pixel-width interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidthRange {
    pub min: u32,
    pub max: u32,
}

impl WidthRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn contains(&self, width: u32) -> bool {
        self.min <= width && width <= self.max
    }
}

/// Minimum width, in pixels, at which each screen size begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoints {
    pub xxl: u32,
    pub xl: u32,
    pub lg: u32,
    pub md: u32,
    /// `None` means "everything below `md`".
    pub sm: Option<u32>,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Per-instance replacements for some of the default thresholds.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BreakpointOverrides {
    pub xxl: Option<u32>,
    pub xl: Option<u32>,
    pub lg: Option<u32>,
    pub md: Option<u32>,
    pub sm: Option<u32>,
}

impl BreakpointOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xxl(mut self, px: u32) -> Self {
        self.xxl = Some(px);
        self
    }

    pub fn xl(mut self, px: u32) -> Self {
        self.xl = Some(px);
        self
    }

    pub fn lg(mut self, px: u32) -> Self {
        self.lg = Some(px);
        self
    }

    pub fn md(mut self, px: u32) -> Self {
        self.md = Some(px);
        self
    }

    pub fn sm(mut self, px: u32) -> Self {
        self.sm = Some(px);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BreakpointError {
    #[error("breakpoint {lower} ({lower_px}px) must be below {upper} ({upper_px}px)")]
    Unordered {
        lower: ScreenSize,
        lower_px: u32,
        upper: ScreenSize,
        upper_px: u32,
    },
}

impl Breakpoints {
    pub const LEGACY: Breakpoints = Breakpoints {
        xxl: 1536,
        xl: 1280,
        lg: 1024,
        md: 768,
        sm: None,
    };

    pub const CURRENT: Breakpoints = Breakpoints {
        sm: Some(640),
        ..Self::LEGACY
    };

    /// Fill in every threshold, taking an override only when it is set and
    /// non-zero. A zero override falls back to the default, the same as a
    /// missing one.
    pub fn resolve(variant: Variant, overrides: &BreakpointOverrides) -> Breakpoints {
        fn pick(value: Option<u32>, default: u32) -> u32 {
            value.filter(|px| *px != 0).unwrap_or(default)
        }

        let defaults = variant.defaults();
        Breakpoints {
            xxl: pick(overrides.xxl, defaults.xxl),
            xl: pick(overrides.xl, defaults.xl),
            lg: pick(overrides.lg, defaults.lg),
            md: pick(overrides.md, defaults.md),
            sm: match defaults.sm {
                Some(default) => Some(pick(overrides.sm, default)),
                None => overrides.sm.filter(|px| *px != 0),
            },
        }
    }

    /// Like [`Breakpoints::resolve`], but any override that is set wins,
    /// including zero.
    pub fn resolve_explicit(variant: Variant, overrides: &BreakpointOverrides) -> Breakpoints {
        let defaults = variant.defaults();
        Breakpoints {
            xxl: overrides.xxl.unwrap_or(defaults.xxl),
            xl: overrides.xl.unwrap_or(defaults.xl),
            lg: overrides.lg.unwrap_or(defaults.lg),
            md: overrides.md.unwrap_or(defaults.md),
            sm: overrides.sm.or(defaults.sm),
        }
    }

    pub fn min_width(&self, size: ScreenSize) -> u32 {
        match size {
            ScreenSize::Xxl => self.xxl,
            ScreenSize::Xl => self.xl,
            ScreenSize::Lg => self.lg,
            ScreenSize::Md => self.md,
            ScreenSize::Sm => self.sm.unwrap_or(0),
        }
    }

    /// The width range of every screen size, largest first. Each range ends
    /// one pixel below the next one's start.
    pub fn ranges(&self) -> [(ScreenSize, WidthRange); 5] {
        [
            (ScreenSize::Xxl, WidthRange::new(self.xxl, UNBOUNDED_MAX)),
            (
                ScreenSize::Xl,
                WidthRange::new(self.xl, self.xxl.saturating_sub(1)),
            ),
            (
                ScreenSize::Lg,
                WidthRange::new(self.lg, self.xl.saturating_sub(1)),
            ),
            (
                ScreenSize::Md,
                WidthRange::new(self.md, self.lg.saturating_sub(1)),
            ),
            (
                ScreenSize::Sm,
                WidthRange::new(self.sm.unwrap_or(0), self.md.saturating_sub(1)),
            ),
        ]
    }

    pub fn range(&self, size: ScreenSize) -> WidthRange {
        self.ranges()
            .into_iter()
            .find_map(|(s, range)| (s == size).then_some(range))
            .unwrap_or(WidthRange::new(0, UNBOUNDED_MAX))
    }

    /// Screen size for a known width, without going through any watches.
    pub fn classify(&self, width: u32) -> ScreenSize {
        let flags = self
            .ranges()
            .into_iter()
            .filter(|(_, range)| range.contains(width))
            .fold(SizeFlags::empty(), |flags, (size, _)| flags | size.flag());
        resolve(flags)
    }

    /// Check that the thresholds increase strictly from `sm` to `xxl`.
    ///
    /// Nothing else in this crate calls this; a badly ordered table still
    /// resolves, just not to anything meaningful.
    pub fn validate(&self) -> Result<(), BreakpointError> {
        let mut thresholds = vec![];
        if let Some(sm) = self.sm {
            thresholds.push((ScreenSize::Sm, sm));
        }
        thresholds.extend([
            (ScreenSize::Md, self.md),
            (ScreenSize::Lg, self.lg),
            (ScreenSize::Xl, self.xl),
            (ScreenSize::Xxl, self.xxl),
        ]);

        for pair in thresholds.windows(2) {
            let (lower, lower_px) = pair[0];
            let (upper, upper_px) = pair[1];
            if lower_px >= upper_px {
                return Err(BreakpointError::Unordered {
                    lower,
                    lower_px,
                    upper,
                    upper_px,
                });
            }
        }
        Ok(())
    }
}
