//! Severity categories, levels, and the mask algebra used for sink filtering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::str::FromStr;

/// Entry category, ordered most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Category {
    Error = 0,
    Warning = 1,
    #[default]
    Message = 2,
    Info = 3,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Error,
        Category::Warning,
        Category::Message,
        Category::Info,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Category::Error => "ERROR",
            Category::Warning => "WARNING",
            Category::Message => "MESSAGE",
            Category::Info => "INFO",
        }
    }

    /// Mark pair rendered on either end of an entry header.
    pub fn marks(&self) -> (&'static str, &'static str) {
        match self {
            Category::Error => ("!<", ">!"),
            Category::Warning => ("?<", ">?"),
            Category::Message => ("--", "--"),
            Category::Info => ("..", ".."),
        }
    }

    const fn offset(self) -> u16 {
        (self as u16) * 4
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(Category::Error),
            "WARN" | "WARNING" => Ok(Category::Warning),
            "MESSAGE" => Ok(Category::Message),
            "INFO" => Ok(Category::Info),
            _ => Err(format!("Invalid category: '{}'", s)),
        }
    }
}

/// Severity sub-band within a category. Lower numeric value means more
/// severe: `Critical` (1) outranks `Negligible` (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    Critical = 1,
    Major = 2,
    Minor = 3,
    Negligible = 4,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Critical,
        Level::Major,
        Level::Minor,
        Level::Negligible,
    ];

    /// Numeric band in `[1, 4]`.
    #[inline]
    pub fn as_band(&self) -> u8 {
        *self as u8
    }

    /// Parse a numeric band; `None` outside `[1, 4]`.
    pub fn from_band(band: u8) -> Option<Self> {
        match band {
            1 => Some(Level::Critical),
            2 => Some(Level::Major),
            3 => Some(Level::Minor),
            4 => Some(Level::Negligible),
            _ => None,
        }
    }

    /// The more severe of two levels (numerically smaller band).
    #[inline]
    pub fn max_severity(self, other: Level) -> Level {
        self.min(other)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A set of (category, level) pairs over the fixed 16-bit space.
///
/// Named presets are cumulative prefixes per category, so
/// `critical ⊂ major ⊂ minor ⊂ every` holds independently for each
/// category. Pure value type; combine with `|`, `&`, `^`, `!`.
///
/// # Examples
///
/// ```
/// use prism_log::{Category, Level, SeverityMask};
///
/// let mask = SeverityMask::every(Category::Error) | SeverityMask::critical(Category::Warning);
/// assert!(mask.matches(Category::Error, Level::Negligible));
/// assert!(mask.matches(Category::Warning, Level::Critical));
/// assert!(!mask.matches(Category::Warning, Level::Major));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SeverityMask(u16);

impl SeverityMask {
    /// The empty set; matches nothing.
    pub const EMPTY: SeverityMask = SeverityMask(0);

    /// The full set; matches every (category, level) pair.
    pub const FULL: SeverityMask = SeverityMask(0xFFFF);

    const fn band_bits(category: Category, through_band: u8) -> u16 {
        // Cumulative: bands 1..=through_band of the category.
        let prefix = (1u16 << through_band) - 1;
        prefix << category.offset()
    }

    /// A single (category, level) bit.
    pub const fn single(category: Category, level: Level) -> Self {
        SeverityMask(1 << (category.offset() + (level as u16) - 1))
    }

    /// Level 1 only.
    pub const fn critical(category: Category) -> Self {
        SeverityMask(Self::band_bits(category, 1))
    }

    /// Levels 1 and 2.
    pub const fn major(category: Category) -> Self {
        SeverityMask(Self::band_bits(category, 2))
    }

    /// Levels 1 through 3.
    pub const fn minor(category: Category) -> Self {
        SeverityMask(Self::band_bits(category, 3))
    }

    /// All four levels of the category.
    pub const fn every(category: Category) -> Self {
        SeverityMask(Self::band_bits(category, 4))
    }

    /// Construct from raw bits; the low 16 bits are the whole space.
    pub const fn from_bits(bits: u16) -> Self {
        SeverityMask(bits)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// True iff the bit for (category, level) is set.
    #[inline]
    pub fn matches(&self, category: Category, level: Level) -> bool {
        self.0 & Self::single(category, level).0 != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True iff every pair in `other` is also in `self`.
    pub const fn contains(&self, other: SeverityMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SeverityMask {
    type Output = SeverityMask;
    fn bitor(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 | rhs.0)
    }
}

impl BitAnd for SeverityMask {
    type Output = SeverityMask;
    fn bitand(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 & rhs.0)
    }
}

impl BitXor for SeverityMask {
    type Output = SeverityMask;
    fn bitxor(self, rhs: SeverityMask) -> SeverityMask {
        SeverityMask(self.0 ^ rhs.0)
    }
}

impl Not for SeverityMask {
    type Output = SeverityMask;
    fn not(self) -> SeverityMask {
        SeverityMask(!self.0)
    }
}

impl BitOrAssign for SeverityMask {
    fn bitor_assign(&mut self, rhs: SeverityMask) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for SeverityMask {
    fn bitand_assign(&mut self, rhs: SeverityMask) {
        self.0 &= rhs.0;
    }
}

impl BitXorAssign for SeverityMask {
    fn bitxor_assign(&mut self, rhs: SeverityMask) {
        self.0 ^= rhs.0;
    }
}
