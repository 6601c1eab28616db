//! Matching a basket of components against one combination template.
//!
//! Matching runs in two phases:
//!
//! 1. [`fast_check`] rejects on basket size and missing instrument types
//!    without permuting anything.
//! 2. [`final_check`] either scans the basket linearly (`More`) or searches
//!    permutations of the basket (`Fixed`, `Multiply`) for an assignment of
//!    components to template slots that satisfies every leg.
//!
//! # Search
//!
//! Permutations are visited in lexicographic order of component indices,
//! starting from the identity. The search is depth-first: a slot is filled
//! with the lowest unused component that passes the slot's checks given the
//! prefix, and a prefix is abandoned as soon as no component fits the next
//! slot. Every check depends only on the prefix, so the first complete
//! assignment found is the first valid permutation in lexicographic order.
//!
//! The worst case is factorial in the basket size. Baskets are expected to
//! hold a handful of legs; callers that need bounded latency should cap the
//! leg count (see `Classifier::with_max_legs`).
//!
//! # Consistency state
//!
//! Strike and expiration labels and offsets are tracked in a [`Consistency`]
//! value created fresh for each search. It is shared by all groups of one
//! candidate assignment, so a `Multiply` template can require the same
//! label value in every group. Each branch of the search works on its own
//! copy, so nothing recorded by an abandoned prefix leaks into a sibling.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;

use rust_decimal::Decimal;

use super::expiration::Expiration;
use super::leg::{ExpirationConstraint, LegTemplate, StrikeConstraint};
use super::template::{Cardinality, CombinationTemplate};
use super::types::{Component, InstrumentType};

/// Label and offset bookkeeping for one kind of value (strike or expiration).
#[derive(Debug, Clone)]
struct Ledger<T> {
    labels: BTreeMap<char, T>,
    offsets: BTreeMap<i32, T>,
}

impl<T: Ord + Copy> Ledger<T> {
    const fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
            offsets: BTreeMap::new(),
        }
    }

    /// Every component carrying `label` must have the same value.
    fn admit_label(&mut self, label: char, value: T) -> bool {
        match self.labels.entry(label) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(seen) => *seen.get() == value,
        }
    }

    /// Values must be ordered like their offsets: a lower offset means a
    /// strictly lower value, equal offsets mean equal values.
    fn admit_offset(&mut self, offset: i32, value: T) -> bool {
        if let Some(seen) = self.offsets.get(&offset) {
            return *seen == value;
        }

        let ordered = self
            .offsets
            .iter()
            .all(|(other, seen)| match other.cmp(&offset) {
                Ordering::Less => *seen < value,
                Ordering::Greater => *seen > value,
                Ordering::Equal => *seen == value,
            });
        if ordered {
            self.offsets.insert(offset, value);
        }
        ordered
    }
}

/// Cross-group consistency state for one candidate assignment.
#[derive(Debug, Clone)]
struct Consistency {
    strikes: Ledger<Decimal>,
    expirations: Ledger<Expiration>,
}

impl Consistency {
    const fn new() -> Self {
        Self {
            strikes: Ledger::new(),
            expirations: Ledger::new(),
        }
    }

    /// Check `component` against `leg` and record its strike and expiration.
    ///
    /// `anchor` is the expiration of the component in the group's first slot.
    fn admit(&mut self, leg: &LegTemplate, component: &Component, anchor: &Expiration) -> bool {
        if !leg.accepts(component) {
            return false;
        }

        let strike_ok = match leg.strike {
            StrikeConstraint::Any => true,
            StrikeConstraint::Label(label) => self.strikes.admit_label(label, component.strike),
            StrikeConstraint::Offset(offset) => self.strikes.admit_offset(offset, component.strike),
        };
        if !strike_ok {
            return false;
        }

        match leg.expiration {
            ExpirationConstraint::Any => true,
            ExpirationConstraint::Label(label) => {
                self.expirations.admit_label(label, component.expiration)
            }
            ExpirationConstraint::Offset(offset) => {
                self.expirations.admit_offset(offset, component.expiration)
            }
            ExpirationConstraint::Period(period) => {
                anchor.satisfies_period(period, &component.expiration)
            }
        }
    }
}

/// Depth-first permutation search over a basket.
struct Search<'a> {
    legs: &'a [LegTemplate],
    components: &'a [Component],
    permutation: Vec<usize>,
    used: Vec<bool>,
}

impl<'a> Search<'a> {
    fn new(legs: &'a [LegTemplate], components: &'a [Component]) -> Self {
        Self {
            legs,
            components,
            permutation: Vec::with_capacity(components.len()),
            used: vec![false; components.len()],
        }
    }

    fn run(mut self) -> Option<Vec<usize>> {
        self.extend(&Consistency::new()).then_some(self.permutation)
    }

    fn extend(&mut self, state: &Consistency) -> bool {
        let (legs, components) = (self.legs, self.components);
        let slot = self.permutation.len();
        if slot == components.len() {
            return true;
        }

        let width = legs.len();
        let leg = &legs[slot % width];
        let group_start = slot - slot % width;

        for (index, component) in components.iter().enumerate() {
            if self.used[index] {
                continue;
            }
            let anchor = if slot == group_start {
                component.expiration
            } else {
                components[self.permutation[group_start]].expiration
            };

            let mut next = state.clone();
            if !next.admit(leg, component, &anchor) {
                continue;
            }

            self.used[index] = true;
            self.permutation.push(index);
            if self.extend(&next) {
                return true;
            }
            self.permutation.pop();
            self.used[index] = false;
        }
        false
    }
}

/// Cheap rejection on basket size and instrument types.
#[must_use]
pub fn fast_check(template: &CombinationTemplate, components: &[Component]) -> bool {
    let width = template.legs().len();
    match template.cardinality() {
        Cardinality::More { min_count } => return components.len() >= min_count,
        Cardinality::Fixed => {
            if components.is_empty() || components.len() != width {
                return false;
            }
        }
        Cardinality::Multiply => {
            if components.is_empty() || width == 0 || components.len() % width != 0 {
                return false;
            }
        }
    }

    let present: BTreeSet<InstrumentType> =
        components.iter().map(|c| c.instrument_type).collect();
    template.legs().iter().all(|leg| match leg.instrument_type {
        InstrumentType::Option => {
            present.contains(&InstrumentType::Put) || present.contains(&InstrumentType::Call)
        }
        required => present.contains(&required),
    })
}

/// Full structural check.
///
/// Returns the accepted permutation: entry `j` is the index of the
/// component filling slot `j`.
#[must_use]
pub fn final_check(template: &CombinationTemplate, components: &[Component]) -> Option<Vec<usize>> {
    match template.cardinality() {
        Cardinality::More { .. } => {
            let leg = template.legs().first()?;
            components
                .iter()
                .all(|c| leg.accepts(c))
                .then(|| (0..components.len()).collect())
        }
        Cardinality::Fixed | Cardinality::Multiply => {
            let width = template.legs().len();
            if width == 0 || components.len() % width != 0 {
                return None;
            }
            Search::new(template.legs(), components).run()
        }
    }
}

/// Match `components` against `template`.
///
/// On success returns the role assignment parallel to `components`: the
/// 1-based slot each component fills.
#[must_use]
pub fn match_template(template: &CombinationTemplate, components: &[Component]) -> Option<Vec<usize>> {
    if !fast_check(template, components) {
        return None;
    }
    final_check(template, components).map(|permutation| roles_from_permutation(&permutation))
}

/// Invert a slot → component permutation into component → 1-based slot.
fn roles_from_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut roles = vec![0; permutation.len()];
    for (slot, &component) in permutation.iter().enumerate() {
        roles[component] = slot + 1;
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::{Period, RatioConstraint, Sign};
    use rust_decimal_macros::dec;

    fn components(legs: &[&str]) -> Vec<Component> {
        legs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn long(instrument_type: InstrumentType) -> LegTemplate {
        LegTemplate::new(instrument_type, RatioConstraint::Sign(Sign::Positive))
    }

    fn ascending_calls() -> CombinationTemplate {
        CombinationTemplate::new(
            "Ascending Calls",
            vec![
                long(InstrumentType::Call).with_strike(StrikeConstraint::Offset(0)),
                long(InstrumentType::Call).with_strike(StrikeConstraint::Offset(1)),
            ],
            Cardinality::Multiply,
        )
        .unwrap()
    }

    #[test]
    fn test_ledger_offsets_enforce_strict_order() {
        let mut ledger = Ledger::new();
        assert!(ledger.admit_offset(0, dec!(100)));
        assert!(ledger.admit_offset(2, dec!(110)));
        assert!(!ledger.clone().admit_offset(1, dec!(110)));
        assert!(!ledger.clone().admit_offset(1, dec!(100)));
        assert!(ledger.clone().admit_offset(1, dec!(105)));
        assert!(ledger.admit_offset(0, dec!(100)));
        assert!(!ledger.admit_offset(0, dec!(101)));
        assert!(ledger.admit_offset(-1, dec!(50)));
    }

    #[test]
    fn test_ledger_labels() {
        let mut ledger = Ledger::new();
        assert!(ledger.admit_label('A', dec!(100)));
        assert!(ledger.admit_label('B', dec!(100)));
        assert!(ledger.admit_label('A', dec!(100)));
        assert!(!ledger.admit_label('A', dec!(105)));
    }

    #[test]
    fn test_offsets_identity_order() {
        let basket = components(&["C 1 100 2010-09-17", "C 1 105 2010-09-17"]);
        assert_eq!(match_template(&ascending_calls(), &basket), Some(vec![1, 2]));
    }

    #[test]
    fn test_offsets_require_permutation_search() {
        let basket = components(&["C 1 105 2010-09-17", "C 1 100 2010-09-17"]);
        let permutation = final_check(&ascending_calls(), &basket).unwrap();
        assert_eq!(permutation, vec![1, 0]);
        assert_eq!(match_template(&ascending_calls(), &basket), Some(vec![2, 1]));
    }

    #[test]
    fn test_offsets_reject_equal_strikes() {
        let basket = components(&["C 1 100 2010-09-17", "C 1 100 2010-09-17"]);
        assert_eq!(match_template(&ascending_calls(), &basket), None);
    }

    #[test]
    fn test_offsets_persist_across_groups() {
        // Offsets are shared by every group, so both groups need the same strikes.
        let same = components(&[
            "C 1 100 2010-09-17",
            "C 1 105 2010-09-17",
            "C 1 105 2010-09-17",
            "C 1 100 2010-09-17",
        ]);
        assert_eq!(match_template(&ascending_calls(), &same), Some(vec![1, 2, 4, 3]));

        let different = components(&[
            "C 1 100 2010-09-17",
            "C 1 105 2010-09-17",
            "C 1 110 2010-09-17",
            "C 1 115 2010-09-17",
        ]);
        assert_eq!(match_template(&ascending_calls(), &different), None);
    }

    #[test]
    fn test_labels_persist_across_groups() {
        let template = CombinationTemplate::new(
            "Paired Strikes",
            vec![
                long(InstrumentType::Call).with_strike(StrikeConstraint::Label('A')),
                long(InstrumentType::Put).with_strike(StrikeConstraint::Label('A')),
            ],
            Cardinality::Multiply,
        )
        .unwrap();

        let conflicting = components(&[
            "C 1 100 2010-09-17",
            "P 1 100 2010-09-17",
            "C 1 105 2010-09-17",
            "P 1 105 2010-09-17",
        ]);
        assert_eq!(match_template(&template, &conflicting), None);

        let consistent = components(&[
            "P 1 100 2010-09-17",
            "C 1 100 2010-09-17",
            "P 1 100 2010-09-17",
            "C 1 100 2010-09-17",
        ]);
        assert_eq!(match_template(&template, &consistent), Some(vec![2, 1, 4, 3]));
    }

    #[test]
    fn test_expiration_label_and_option_wildcard() {
        let template = CombinationTemplate::new(
            "Same Expiry Options",
            vec![
                long(InstrumentType::Option).with_expiration(ExpirationConstraint::Label('X')),
                long(InstrumentType::Option).with_expiration(ExpirationConstraint::Label('X')),
            ],
            Cardinality::Fixed,
        )
        .unwrap();

        let same = components(&["P 1 90 2010-09-17", "C 2 110 2010-09-17"]);
        assert_eq!(match_template(&template, &same), Some(vec![1, 2]));

        let split = components(&["P 1 90 2010-09-17", "C 2 110 2010-12-17"]);
        assert_eq!(match_template(&template, &split), None);
    }

    #[test]
    fn test_period_uses_group_anchor() {
        let template = CombinationTemplate::new(
            "Quarterly Roll",
            vec![
                long(InstrumentType::Future),
                long(InstrumentType::Future)
                    .with_expiration(ExpirationConstraint::Period(Period::quarters(1))),
            ],
            Cardinality::Multiply,
        )
        .unwrap();

        let basket = components(&[
            "F 1 2010-12-01",
            "F 1 2010-09-01",
            "F 1 2010-06-01",
            "F 1 2010-03-01",
        ]);
        // Slot 0 takes the lowest index that leaves a valid completion.
        assert_eq!(final_check(&template, &basket), Some(vec![1, 0, 3, 2]));
        assert_eq!(match_template(&template, &basket), Some(vec![2, 1, 4, 3]));
    }

    #[test]
    fn test_expiration_offsets_and_exact_ratios() {
        let template = CombinationTemplate::new(
            "Calendar Spread",
            vec![
                LegTemplate::new(InstrumentType::Future, RatioConstraint::Exact(dec!(1)))
                    .with_expiration(ExpirationConstraint::Offset(0)),
                LegTemplate::new(InstrumentType::Future, RatioConstraint::Exact(dec!(-1)))
                    .with_expiration(ExpirationConstraint::Offset(1)),
            ],
            Cardinality::Fixed,
        )
        .unwrap();

        let ok = components(&["F -1 2010-12-01", "F 1 2010-09-01"]);
        assert_eq!(match_template(&template, &ok), Some(vec![2, 1]));

        let inverted = components(&["F -1 2010-09-01", "F 1 2010-12-01"]);
        assert_eq!(match_template(&template, &inverted), None);

        let wrong_ratio = components(&["F -2 2010-12-01", "F 1 2010-09-01"]);
        assert_eq!(match_template(&template, &wrong_ratio), None);
    }

    #[test]
    fn test_fast_check_sizes() {
        let multiply = ascending_calls();
        assert!(!fast_check(&multiply, &[]));
        assert!(!fast_check(&multiply, &components(&["C 1 100 2010-09-17"; 3])));
        assert!(fast_check(&multiply, &components(&["C 1 100 2010-09-17"; 4])));

        let fixed =
            CombinationTemplate::new("Fixed Pair", vec![long(InstrumentType::Call); 2], Cardinality::Fixed)
                .unwrap();
        assert!(fast_check(&fixed, &components(&["C 1 100 2010-09-17"; 2])));
        assert!(!fast_check(&fixed, &components(&["C 1 100 2010-09-17"; 4])));
    }

    #[test]
    fn test_fast_check_instrument_types() {
        let template = CombinationTemplate::new(
            "Future And Option",
            vec![long(InstrumentType::Future), long(InstrumentType::Option)],
            Cardinality::Fixed,
        )
        .unwrap();
        assert!(fast_check(&template, &components(&["F 1 2010-09-01", "P 1 100 2010-09-17"])));
        assert!(!fast_check(&template, &components(&["F 1 2010-09-01", "F 1 2010-09-01"])));
        assert!(!fast_check(&template, &components(&["C 1 100 2010-09-17", "P 1 100 2010-09-17"])));
    }

    #[test]
    fn test_more_is_identity_and_ignores_strike_constraints() {
        let template = CombinationTemplate::new(
            "Futures Pack",
            vec![long(InstrumentType::Future).with_strike(StrikeConstraint::Offset(3))],
            Cardinality::More { min_count: 2 },
        )
        .unwrap();

        let three = components(&["F 1 2010-09-01", "F 1 2010-06-01", "F 1 2010-09-01"]);
        assert_eq!(match_template(&template, &three), Some(vec![1, 2, 3]));
        assert_eq!(match_template(&template, &three[..1]), None);

        let mixed = components(&["F 1 2010-09-01", "F -1 2010-06-01"]);
        assert_eq!(match_template(&template, &mixed), None);
    }

    #[test]
    fn test_roles_from_permutation() {
        assert_eq!(roles_from_permutation(&[2, 0, 1]), vec![2, 3, 1]);
        assert!(roles_from_permutation(&[]).is_empty());
    }
}
