//! Property-based tests for the severity mask algebra using proptest

use proptest::prelude::*;
use prism_log::{Category, Chunk, Level, SeverityMask, Sink, SinkTarget};

fn any_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Error),
        Just(Category::Warning),
        Just(Category::Message),
        Just(Category::Info),
    ]
}

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Critical),
        Just(Level::Major),
        Just(Level::Minor),
        Just(Level::Negligible),
    ]
}

fn any_mask() -> impl Strategy<Value = SeverityMask> {
    any::<u16>().prop_map(SeverityMask::from_bits)
}

fn sink_with_masks(primary: SeverityMask, extra: SeverityMask) -> Sink {
    Sink::new("memory", primary, extra, SinkTarget::Stream(Box::new(Vec::new())))
}

proptest! {
    /// Widening a mask can only add matching pairs, never remove them.
    #[test]
    fn test_mask_widening_is_monotone(mask in any_mask(), widening in any_mask()) {
        let widened = mask | widening;
        for category in Category::ALL {
            for level in Level::ALL {
                if mask.matches(category, level) {
                    prop_assert!(widened.matches(category, level));
                }
            }
        }
    }

    /// `should_write` is monotone under mask widening, independently for
    /// primary and extra chunks.
    #[test]
    fn test_should_write_is_monotone(
        primary in any_mask(),
        extra in any_mask(),
        widening in any_mask(),
        category in any_category(),
        level in any_level(),
        is_extra in any::<bool>(),
    ) {
        let narrow = sink_with_masks(primary, extra);
        let wide = sink_with_masks(primary | widening, extra | widening);

        let chunk = Chunk::new("text".to_string(), category, level, is_extra);
        if narrow.should_write(&chunk) {
            prop_assert!(wide.should_write(&chunk));
        }
    }

    /// Named presets form a strict chain per category, and never leak
    /// into other categories.
    #[test]
    fn test_preset_chain(category in any_category()) {
        let critical = SeverityMask::critical(category);
        let major = SeverityMask::major(category);
        let minor = SeverityMask::minor(category);
        let every = SeverityMask::every(category);

        prop_assert!(major.contains(critical));
        prop_assert!(minor.contains(major));
        prop_assert!(every.contains(minor));

        for other in Category::ALL {
            if other != category {
                for level in Level::ALL {
                    prop_assert!(!every.matches(other, level));
                }
            }
        }
    }

    /// A preset matches exactly the levels at or above its severity cut.
    #[test]
    fn test_preset_matches_numeric_prefix(category in any_category(), level in any_level()) {
        prop_assert_eq!(SeverityMask::critical(category).matches(category, level), level.as_band() <= 1);
        prop_assert_eq!(SeverityMask::major(category).matches(category, level), level.as_band() <= 2);
        prop_assert_eq!(SeverityMask::minor(category).matches(category, level), level.as_band() <= 3);
        prop_assert!(SeverityMask::every(category).matches(category, level));
    }

    /// De Morgan over the fixed 16-bit space.
    #[test]
    fn test_de_morgan(a in any_mask(), b in any_mask()) {
        prop_assert_eq!(!(a | b), !a & !b);
        prop_assert_eq!(!(a & b), !a | !b);
    }

    /// XOR is symmetric difference.
    #[test]
    fn test_xor_is_symmetric_difference(a in any_mask(), b in any_mask()) {
        prop_assert_eq!(a ^ b, (a | b) & !(a & b));
        prop_assert_eq!(a ^ a, SeverityMask::EMPTY);
    }

    /// `matches` agrees with single-bit intersection.
    #[test]
    fn test_matches_agrees_with_single_bit(
        mask in any_mask(),
        category in any_category(),
        level in any_level(),
    ) {
        let bit = SeverityMask::single(category, level);
        prop_assert_eq!(mask.matches(category, level), !(mask & bit).is_empty());
    }

    /// Category string conversions roundtrip.
    #[test]
    fn test_category_str_roundtrip(category in any_category()) {
        let parsed: Category = category.to_str().parse().unwrap();
        prop_assert_eq!(parsed, category);
    }

    /// Level band conversions roundtrip.
    #[test]
    fn test_level_band_roundtrip(level in any_level()) {
        prop_assert_eq!(Level::from_band(level.as_band()), Some(level));
    }

    /// Mask serde roundtrips through JSON.
    #[test]
    fn test_mask_serde_roundtrip(mask in any_mask()) {
        let json = serde_json::to_string(&mask).unwrap();
        let back: SeverityMask = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(mask, back);
    }
}
