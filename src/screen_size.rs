use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

bitflags! {
  /// One match flag per [`ScreenSize`], as reported by the width-range watches.
  #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
  #[must_use]
  pub struct SizeFlags: u8 {
    const SM = 1;
    const MD = 2;
    const LG = 4;
    const XL = 8;
    const XXL = 16;
  }
}

/// The five screen-size labels, ordered from smallest to largest.
#[derive(
    Default,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScreenSize {
    #[default]
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl ScreenSize {
    /// Every label, largest first. This is the resolver's priority order.
    pub const DESCENDING: [ScreenSize; 5] = [
        ScreenSize::Xxl,
        ScreenSize::Xl,
        ScreenSize::Lg,
        ScreenSize::Md,
        ScreenSize::Sm,
    ];

    pub const fn flag(self) -> SizeFlags {
        match self {
            ScreenSize::Sm => SizeFlags::SM,
            ScreenSize::Md => SizeFlags::MD,
            ScreenSize::Lg => SizeFlags::LG,
            ScreenSize::Xl => SizeFlags::XL,
            ScreenSize::Xxl => SizeFlags::XXL,
        }
    }
}

/// Pick the single screen size for a set of match flags.
///
/// The largest set flag wins. With no flag set, or only `SM`, the result is
/// [`ScreenSize::Sm`]. Well formed watches never report more than one flag,
/// so the ordering only decides ties between overlapping ranges.
pub fn resolve(flags: SizeFlags) -> ScreenSize {
    if flags.contains(SizeFlags::XXL) {
        return ScreenSize::Xxl;
    }
    if flags.contains(SizeFlags::XL) {
        return ScreenSize::Xl;
    }
    if flags.contains(SizeFlags::LG) {
        return ScreenSize::Lg;
    }
    if flags.contains(SizeFlags::MD) {
        return ScreenSize::Md;
    }
    ScreenSize::Sm
}
