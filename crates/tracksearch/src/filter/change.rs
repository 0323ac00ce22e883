//! How a filter changed, used to pick the minimal recheck set.

use super::value::Filter;
use crate::date::DateRange;
use crate::geo::LocationFilter;

/// Relationship between an old and a new filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterChange {
    /// Both accept exactly the same files.
    Same,
    /// The new filter accepts a strict superset.
    Wider,
    /// The new filter accepts a strict subset.
    Narrower,
    /// Neither accepts a superset of the other.
    Different,
}

impl FilterChange {
    /// Combines the results of two independent axes.
    ///
    /// `Same` is the identity; two distinct non-`Same` results give `Different`.
    pub fn combine(self, other: FilterChange) -> FilterChange {
        match (self, other) {
            (Self::Same, change) | (change, Self::Same) => change,
            (a, b) if a == b => a,
            _ => Self::Different,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Wider => "wider",
            Self::Narrower => "narrower",
            Self::Different => "different",
        }
    }
}

impl Filter {
    /// Describes how `new` relates to `old`.
    pub fn compare(old: &Filter, new: &Filter) -> FilterChange {
        compare_text(old.text(), new.text())
            .combine(compare_dates(old.date_range(), new.date_range()))
            .combine(compare_locations(old.location(), new.location()))
    }
}

/// Result for an axis where `None` means "no constraint".
fn compare_constraints<T>(
    old: Option<T>,
    new: Option<T>,
    same: impl Fn(&T, &T) -> bool,
    includes: impl Fn(&T, &T) -> bool,
) -> FilterChange {
    match (old, new) {
        (None, None) => FilterChange::Same,
        (None, Some(_)) => FilterChange::Narrower,
        (Some(_), None) => FilterChange::Wider,
        (Some(old), Some(new)) => {
            if same(&old, &new) {
                FilterChange::Same
            } else if includes(&new, &old) {
                FilterChange::Wider
            } else if includes(&old, &new) {
                FilterChange::Narrower
            } else {
                FilterChange::Different
            }
        }
    }
}

/// A longer search text that contains the shorter one accepts fewer files.
fn compare_text(old: &str, new: &str) -> FilterChange {
    let old = (!old.is_empty()).then_some(old);
    let new = (!new.is_empty()).then_some(new);
    compare_constraints(
        old,
        new,
        |a, b| a == b,
        // `a` accepts everything `b` accepts when `a` is a substring of `b`
        |a, b| b.contains(*a),
    )
}

fn compare_dates(old: DateRange, new: DateRange) -> FilterChange {
    let old = old.is_constrained().then_some(old);
    let new = new.is_constrained().then_some(new);
    compare_constraints(old, new, |a, b| a == b, |a, b| a.includes(b))
}

fn compare_locations(old: Option<&LocationFilter>, new: Option<&LocationFilter>) -> FilterChange {
    compare_constraints(old, new, |a, b| a.same_area(b), |a, b| a.includes(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{DistanceUnit, GeoPoint};

    fn near(radius_km: f64) -> LocationFilter {
        LocationFilter::new(GeoPoint::new(46.0, 7.0), radius_km, DistanceUnit::Kilometres)
    }

    #[test]
    fn identical_filters_are_same() {
        let filter = Filter::new("summit", "2024", Some(near(5.0)));
        assert_eq!(Filter::compare(&filter, &filter), FilterChange::Same);
        assert_eq!(
            Filter::compare(&Filter::EMPTY, &Filter::EMPTY),
            FilterChange::Same
        );
    }

    #[test]
    fn case_and_whitespace_do_not_matter() {
        let a = Filter::new("Summit", "", None);
        let b = Filter::new("  summit ", "", None);
        assert_eq!(Filter::compare(&a, &b), FilterChange::Same);
    }

    #[test]
    fn invalid_and_empty_dates_are_same() {
        let a = Filter::new("", "", None);
        let b = Filter::new("", "banana", None);
        assert_eq!(Filter::compare(&a, &b), FilterChange::Same);
    }

    #[test]
    fn adding_constraints_narrows() {
        let loose = Filter::new("summit", "", None);
        let strict = Filter::new("summit lodge", "2024", Some(near(5.0)));
        assert_eq!(Filter::compare(&loose, &strict), FilterChange::Narrower);
        assert_eq!(Filter::compare(&strict, &loose), FilterChange::Wider);
    }

    #[test]
    fn text_axis() {
        let summit = Filter::new("summit", "", None);
        let lodge = Filter::new("summit lodge", "", None);
        let lake = Filter::new("lake", "", None);
        assert_eq!(Filter::compare(&summit, &lodge), FilterChange::Narrower);
        assert_eq!(Filter::compare(&lodge, &summit), FilterChange::Wider);
        assert_eq!(Filter::compare(&summit, &lake), FilterChange::Different);
        assert_eq!(Filter::compare(&Filter::EMPTY, &lake), FilterChange::Narrower);
        assert_eq!(Filter::compare(&lake, &Filter::EMPTY), FilterChange::Wider);
    }

    #[test]
    fn date_axis() {
        let year = Filter::new("", "2024", None);
        let month = Filter::new("", "2024-06", None);
        let other = Filter::new("", "2023", None);
        assert_eq!(Filter::compare(&year, &month), FilterChange::Narrower);
        assert_eq!(Filter::compare(&month, &year), FilterChange::Wider);
        assert_eq!(Filter::compare(&year, &other), FilterChange::Different);
    }

    #[test]
    fn location_axis() {
        let small = Filter::new("", "", Some(near(1.0)));
        let large = Filter::new("", "", Some(near(10.0)));
        let elsewhere = Filter::new(
            "",
            "",
            Some(LocationFilter::new(
                GeoPoint::new(10.0, 10.0),
                1.0,
                DistanceUnit::Kilometres,
            )),
        );
        assert_eq!(Filter::compare(&small, &large), FilterChange::Wider);
        assert_eq!(Filter::compare(&large, &small), FilterChange::Narrower);
        assert_eq!(Filter::compare(&small, &elsewhere), FilterChange::Different);
        let same_in_metres = Filter::new(
            "",
            "",
            Some(LocationFilter::new(
                GeoPoint::new(46.0, 7.0),
                1_000.0,
                DistanceUnit::Metres,
            )),
        );
        assert_eq!(Filter::compare(&small, &same_in_metres), FilterChange::Same);
    }

    #[test]
    fn mixed_directions_are_different() {
        // Text narrowed while the date widened
        let old = Filter::new("summit", "2024-06", None);
        let new = Filter::new("summit lodge", "2024", None);
        assert_eq!(Filter::compare(&old, &new), FilterChange::Different);
    }

    #[test]
    fn combine_rules() {
        use FilterChange::*;
        assert_eq!(Same.combine(Wider), Wider);
        assert_eq!(Narrower.combine(Same), Narrower);
        assert_eq!(Wider.combine(Wider), Wider);
        assert_eq!(Wider.combine(Narrower), Different);
        assert_eq!(Different.combine(Same), Different);
        assert_eq!(Different.combine(Different), Different);
    }
}
