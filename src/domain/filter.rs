//! Filter types, range derivation and the filter predicate.
//!
//! Everything here is pure: a [`FilterSpec`] is plain data, [`matches`] and
//! [`filter_skips`] evaluate it against skips, and [`derive_ranges`] computes
//! the bounds a dataset actually spans.
//!
//! # Predicate
//!
//! A skip matches when all four clauses hold:
//!
//! 1. its size lies inside the size range (inclusive)
//! 2. its hire period lies inside the hire period range (inclusive)
//! 3. the heavy waste requirement is unconstrained or equals the skip's flag
//! 4. the road placement requirement is unconstrained or equals the skip's flag

use crate::domain::Skip;
use serde::{Deserialize, Serialize};

/// Size bounds used before any dataset has been observed.
pub const FALLBACK_SIZE_RANGE: Bounds = Bounds { min: 0, max: 50 };

/// Hire period bounds used before any dataset has been observed.
pub const FALLBACK_HIRE_PERIOD_RANGE: Bounds = Bounds { min: 0, max: 30 };

/// An inclusive `[min, max]` range over whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    /// Builds a range, raising `max` to `min` if the pair is inverted.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min > max {
            Self { min, max: min }
        } else {
            Self { min, max }
        }
    }

    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Moves the lower end; the upper end follows if it would fall below.
    #[must_use]
    pub const fn with_min(self, min: u32) -> Self {
        Self {
            min,
            max: if min > self.max { min } else { self.max },
        }
    }

    /// Moves the upper end; the lower end follows if it would rise above.
    #[must_use]
    pub const fn with_max(self, max: u32) -> Self {
        Self {
            min: if max < self.min { max } else { self.min },
            max,
        }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// A tri-state filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Requirement {
    /// Any value passes.
    #[default]
    Unconstrained,
    /// Only skips with the flag set pass.
    RequireTrue,
    /// Only skips with the flag cleared pass.
    RequireFalse,
}

impl Requirement {
    /// Whether `value` satisfies this requirement.
    #[must_use]
    pub const fn admits(self, value: bool) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::RequireTrue => value,
            Self::RequireFalse => !value,
        }
    }

    #[must_use]
    pub const fn is_constrained(self) -> bool {
        !matches!(self, Self::Unconstrained)
    }
}

impl From<Option<bool>> for Requirement {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unconstrained,
            Some(true) => Self::RequireTrue,
            Some(false) => Self::RequireFalse,
        }
    }
}

impl std::str::FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "all" | "unconstrained" => Ok(Self::Unconstrained),
            "yes" | "true" | "only" => Ok(Self::RequireTrue),
            "no" | "false" => Ok(Self::RequireFalse),
            other => Err(format!("unknown requirement '{other}' (expected any, yes or no)")),
        }
    }
}

/// Bounds spanned by a dataset, as produced by [`derive_ranges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranges {
    pub size: Bounds,
    pub hire_period: Bounds,
}

impl Ranges {
    /// The provisional ranges reported for an empty dataset.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            size: FALLBACK_SIZE_RANGE,
            hire_period: FALLBACK_HIRE_PERIOD_RANGE,
        }
    }
}

/// The composite, user-adjustable filter applied to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    pub size_range: Bounds,
    pub hire_period_range: Bounds,
    pub heavy_waste: Requirement,
    pub road_placement: Requirement,
}

impl FilterSpec {
    /// A spec spanning `ranges` exactly with both requirements unconstrained.
    #[must_use]
    pub const fn spanning(ranges: Ranges) -> Self {
        Self {
            size_range: ranges.size,
            hire_period_range: ranges.hire_period,
            heavy_waste: Requirement::Unconstrained,
            road_placement: Requirement::Unconstrained,
        }
    }

    /// True when this spec narrows anything relative to `ranges`.
    ///
    /// Drives whether a reset control is offered.
    #[must_use]
    pub fn differs_from(&self, ranges: &Ranges) -> bool {
        self.size_range != ranges.size
            || self.hire_period_range != ranges.hire_period
            || self.heavy_waste.is_constrained()
            || self.road_placement.is_constrained()
    }
}

/// Computes the bounds present in `skips`.
///
/// An empty dataset yields [`Ranges::fallback`], which callers must treat as
/// provisional. Otherwise the size range is `[min, max]` of observed sizes and
/// the hire period range is `[0, max]`: the lower bound stays at zero so the
/// shortest possible hire can always be requested.
#[must_use]
pub fn derive_ranges(skips: &[Skip]) -> Ranges {
    let Some(first) = skips.first() else {
        return Ranges::fallback();
    };

    let (min_size, max_size, max_period) = skips.iter().fold(
        (first.size, first.size, first.hire_period_days),
        |(lo, hi, period), skip| {
            (
                lo.min(skip.size),
                hi.max(skip.size),
                period.max(skip.hire_period_days),
            )
        },
    );

    Ranges {
        size: Bounds::new(min_size, max_size),
        hire_period: Bounds::new(0, max_period),
    }
}

/// Evaluates the four filter clauses against one skip.
#[must_use]
pub fn matches(skip: &Skip, spec: &FilterSpec) -> bool {
    spec.size_range.contains(skip.size)
        && spec.hire_period_range.contains(skip.hire_period_days)
        && spec.heavy_waste.admits(skip.allows_heavy_waste)
        && spec.road_placement.admits(skip.allowed_on_road)
}

/// Returns the skips matching `spec`, in their original order.
#[must_use]
pub fn filter_skips<'a>(skips: &'a [Skip], spec: &FilterSpec) -> Vec<&'a Skip> {
    matching(skips, spec).map(|(_, skip)| skip).collect()
}

/// Positions of the skips matching `spec`, ascending.
#[must_use]
pub fn matching_indices(skips: &[Skip], spec: &FilterSpec) -> Vec<usize> {
    matching(skips, spec).map(|(i, _)| i).collect()
}

fn matching<'a, 'b>(skips: &'a [Skip], spec: &'b FilterSpec) -> impl Iterator<Item = (usize, &'a Skip)> + 'b
where
    'a: 'b,
{
    skips.iter().enumerate().filter(move |(_, skip)| matches(skip, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skip::fixtures::skip;

    fn open_spec() -> FilterSpec {
        FilterSpec::spanning(Ranges {
            size: Bounds::new(0, 100),
            hire_period: Bounds::new(0, 100),
        })
    }

    fn scenario_dataset() -> Vec<Skip> {
        let mut small = skip(1, 4, 7, false, true);
        small.price_before_vat = 200.0;
        let mut large = skip(2, 8, 14, true, false);
        large.price_before_vat = 300.0;
        vec![small, large]
    }

    #[test]
    fn empty_dataset_falls_back_to_provisional_ranges() {
        let ranges = derive_ranges(&[]);
        assert_eq!(ranges.size, Bounds { min: 0, max: 50 });
        assert_eq!(ranges.hire_period, Bounds { min: 0, max: 30 });
    }

    #[test]
    fn ranges_span_observed_sizes_and_pin_hire_period_to_zero() {
        let skips = vec![
            skip(1, 6, 7, false, true),
            skip(2, 20, 3, false, true),
            skip(3, 4, 14, true, false),
        ];
        let ranges = derive_ranges(&skips);
        assert_eq!(ranges.size, Bounds { min: 4, max: 20 });
        assert_eq!(ranges.hire_period, Bounds { min: 0, max: 14 });
    }

    #[test]
    fn single_item_dataset_yields_degenerate_size_range() {
        let ranges = derive_ranges(&[skip(1, 12, 5, false, true)]);
        assert_eq!(ranges.size, Bounds { min: 12, max: 12 });
        assert_eq!(ranges.hire_period, Bounds { min: 0, max: 5 });
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let target = skip(1, 8, 14, false, true);
        let mut spec = open_spec();
        spec.size_range = Bounds::new(8, 8);
        spec.hire_period_range = Bounds::new(14, 14);
        assert!(matches(&target, &spec));
    }

    #[test]
    fn each_clause_can_falsify_the_match_on_its_own() {
        let target = skip(1, 8, 14, true, false);
        assert!(matches(&target, &open_spec()));

        let mut size = open_spec();
        size.size_range = Bounds::new(9, 20);
        assert!(!matches(&target, &size));

        let mut period = open_spec();
        period.hire_period_range = Bounds::new(0, 13);
        assert!(!matches(&target, &period));

        let mut heavy = open_spec();
        heavy.heavy_waste = Requirement::RequireFalse;
        assert!(!matches(&target, &heavy));

        let mut road = open_spec();
        road.road_placement = Requirement::RequireTrue;
        assert!(!matches(&target, &road));
    }

    #[test]
    fn constrained_requirements_admit_matching_flags() {
        let target = skip(1, 8, 14, true, false);
        let mut spec = open_spec();
        spec.heavy_waste = Requirement::RequireTrue;
        spec.road_placement = Requirement::RequireFalse;
        assert!(matches(&target, &spec));
    }

    #[test]
    fn filter_preserves_dataset_order() {
        let skips = vec![
            skip(5, 10, 7, false, true),
            skip(3, 2, 7, false, true),
            skip(9, 6, 7, false, true),
            skip(1, 4, 7, false, true),
        ];
        let mut spec = open_spec();
        spec.size_range = Bounds::new(4, 10);

        let ids: Vec<i64> = filter_skips(&skips, &spec).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 9, 1]);
        assert_eq!(matching_indices(&skips, &spec), vec![0, 2, 3]);
    }

    #[test]
    fn filter_is_deterministic() {
        let skips = scenario_dataset();
        let mut spec = FilterSpec::spanning(derive_ranges(&skips));
        spec.road_placement = Requirement::RequireTrue;

        assert_eq!(filter_skips(&skips, &spec), filter_skips(&skips, &spec));
    }

    #[test]
    fn heavy_waste_only_narrows_scenario_dataset_to_large_skip() {
        let skips = scenario_dataset();
        let ranges = derive_ranges(&skips);
        assert_eq!(ranges.size, Bounds { min: 4, max: 8 });
        assert_eq!(ranges.hire_period, Bounds { min: 0, max: 14 });

        let mut spec = FilterSpec::spanning(ranges);
        spec.heavy_waste = Requirement::RequireTrue;
        let ids: Vec<i64> = filter_skips(&skips, &spec).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn single_ended_adjustments_keep_min_at_most_max() {
        let bounds = Bounds::new(4, 8);
        assert_eq!(bounds.with_min(10), Bounds { min: 10, max: 10 });
        assert_eq!(bounds.with_max(2), Bounds { min: 2, max: 2 });
        assert_eq!(bounds.with_min(6), Bounds { min: 6, max: 8 });
        assert_eq!(Bounds::new(9, 3), Bounds { min: 9, max: 9 });
    }

    #[test]
    fn spec_differs_from_ranges_when_narrowed_or_constrained() {
        let ranges = Ranges {
            size: Bounds::new(4, 8),
            hire_period: Bounds::new(0, 14),
        };
        let spec = FilterSpec::spanning(ranges);
        assert!(!spec.differs_from(&ranges));

        let mut narrowed = spec;
        narrowed.size_range = Bounds::new(6, 8);
        assert!(narrowed.differs_from(&ranges));

        let mut constrained = spec;
        constrained.road_placement = Requirement::RequireFalse;
        assert!(constrained.differs_from(&ranges));
    }

    #[test]
    fn requirement_parses_cli_words() {
        assert_eq!("any".parse::<Requirement>(), Ok(Requirement::Unconstrained));
        assert_eq!("YES".parse::<Requirement>(), Ok(Requirement::RequireTrue));
        assert_eq!("no".parse::<Requirement>(), Ok(Requirement::RequireFalse));
        assert!("maybe".parse::<Requirement>().is_err());
        assert_eq!(Requirement::from(Some(false)), Requirement::RequireFalse);
    }
}
