//! Range containment

use std::cmp::Ordering;
use std::slice;

use crate::comparator::Comparator;
use crate::identifier::Identifier;
use crate::operator::Operator;
use crate::options::Options;
use crate::range::{test_set, Range};
use crate::version::Version;

/// Whether every version matching `sub` also matches `dom`
///
/// Groups of `sub` that no version can satisfy are ignored, so an empty
/// range is a subset of anything.
pub fn subset(sub: &Range, dom: &Range, options: impl Into<Options>) -> bool {
    let options = options.into();
    let mut saw_non_null = false;

    'outer: for simple_sub in sub.set() {
        for simple_dom in dom.set() {
            let is_sub = simple_subset(simple_sub, simple_dom, options);
            saw_non_null = saw_non_null || is_sub.is_some();
            if is_sub == Some(true) {
                continue 'outer;
            }
        }
        if saw_non_null {
            return false;
        }
    }

    true
}

/// Compare one comparator group against another
///
/// `None` means `sub` matches nothing at all.
fn simple_subset(sub: &[Comparator], dom: &[Comparator], options: Options) -> Option<bool> {
    if sub == dom {
        return Some(true);
    }

    let floor = vec![lowest(options)];
    let mut sub = sub;
    let mut dom = dom;

    if is_any(sub) {
        if is_any(dom) {
            return Some(true);
        }
        sub = &floor;
    }
    if is_any(dom) {
        if options.include_prerelease {
            return Some(true);
        }
        dom = &floor;
    }

    let mut equal: Vec<&Version> = Vec::new();
    let mut gt: Option<&Comparator> = None;
    let mut lt: Option<&Comparator> = None;

    for c in sub {
        let op = c.operator();
        if op.is_greater() {
            gt = Some(match gt {
                Some(current) if !gt_prefers(current, c) => current,
                _ => c,
            });
        } else if op.is_less() {
            lt = Some(match lt {
                Some(current) if !lt_prefers(current, c) => current,
                _ => c,
            });
        } else if let Some(version) = c.semver() {
            if !equal.iter().any(|seen| seen.version() == version.version()) {
                equal.push(version);
            }
        }
    }

    if equal.len() > 1 {
        return None;
    }

    let mut bounds = None;
    if let (Some(g), Some(l)) = (gt, lt) {
        let comp = g.semver().cmp(&l.semver());
        if comp == Ordering::Greater {
            return None;
        }
        if comp == Ordering::Equal
            && (g.operator() != Operator::GreaterThanOrEqual || l.operator() != Operator::LessThanOrEqual)
        {
            return None;
        }
        bounds = Some(comp);
    }

    if let Some(eq) = equal.first() {
        if gt.map_or(false, |g| !test_set(slice::from_ref(g), eq, options)) {
            return None;
        }
        if lt.map_or(false, |l| !test_set(slice::from_ref(l), eq, options)) {
            return None;
        }
        return Some(dom.iter().all(|c| test_set(slice::from_ref(c), eq, options)));
    }

    // Bounds that are a prerelease need a prerelease comparator on the same
    // tuple in dom. <1.2.3-0 is the same as <1.2.3 and needs nothing.
    let mut need_dom_gt_pre = gt
        .and_then(Comparator::semver)
        .filter(|v| !options.include_prerelease && v.is_prerelease());
    let mut need_dom_lt_pre = lt
        .and_then(|l| l.semver().map(|v| (l.operator(), v)))
        .filter(|(_, v)| !options.include_prerelease && v.is_prerelease())
        .filter(|(op, v)| !(*op == Operator::LessThan && v.pre == [Identifier::Numeric(0)]))
        .map(|(_, v)| v);

    let unequal_bounds = bounds != Some(Ordering::Equal);
    let mut has_dom_gt = false;
    let mut has_dom_lt = false;

    for c in dom {
        let op = c.operator();
        has_dom_gt = has_dom_gt || op.is_greater();
        has_dom_lt = has_dom_lt || op.is_less();

        if let Some(g) = gt {
            if need_dom_gt_pre.map_or(false, |needed| pins_prerelease(c, needed)) {
                need_dom_gt_pre = None;
            }
            if op.is_greater() {
                if gt_prefers(g, c) {
                    return Some(false);
                }
            } else if g.operator() == Operator::GreaterThanOrEqual
                && !g.semver().map_or(false, |v| test_set(slice::from_ref(c), v, options))
            {
                return Some(false);
            }
        }

        if let Some(l) = lt {
            if need_dom_lt_pre.map_or(false, |needed| pins_prerelease(c, needed)) {
                need_dom_lt_pre = None;
            }
            if op.is_less() {
                if lt_prefers(l, c) {
                    return Some(false);
                }
            } else if l.operator() == Operator::LessThanOrEqual
                && !l.semver().map_or(false, |v| test_set(slice::from_ref(c), v, options))
            {
                return Some(false);
            }
        }

        if op == Operator::Equal && (gt.is_some() || lt.is_some()) && unequal_bounds {
            return Some(false);
        }
    }

    // A one-sided sub cannot fit in a dom bounded on the other side,
    // unless sub is limited to a single point
    if gt.is_some() && has_dom_lt && lt.is_none() && unequal_bounds {
        return Some(false);
    }
    if lt.is_some() && has_dom_gt && gt.is_none() && unequal_bounds {
        return Some(false);
    }

    if need_dom_gt_pre.is_some() || need_dom_lt_pre.is_some() {
        return Some(false);
    }

    Some(true)
}

fn is_any(group: &[Comparator]) -> bool {
    group.len() == 1 && group[0].is_any()
}

/// `>=0.0.0`, or `>=0.0.0-0` when prereleases are included
fn lowest(options: Options) -> Comparator {
    let mut floor = Version::new(0, 0, 0);
    if options.include_prerelease {
        floor.pre.push(Identifier::Numeric(0));
    }
    Comparator::new(Operator::GreaterThanOrEqual, floor, options)
}

/// Whether `b` is the tighter lower bound; `>1.2.3` is tighter than `>=1.2.3`
fn gt_prefers(a: &Comparator, b: &Comparator) -> bool {
    match a.semver().cmp(&b.semver()) {
        Ordering::Greater => false,
        Ordering::Less => true,
        Ordering::Equal => b.operator() == Operator::GreaterThan && a.operator() == Operator::GreaterThanOrEqual,
    }
}

/// Whether `b` is the tighter upper bound; `<1.2.3` is tighter than `<=1.2.3`
fn lt_prefers(a: &Comparator, b: &Comparator) -> bool {
    match a.semver().cmp(&b.semver()) {
        Ordering::Less => false,
        Ordering::Greater => true,
        Ordering::Equal => b.operator() == Operator::LessThan && a.operator() == Operator::LessThanOrEqual,
    }
}

fn pins_prerelease(c: &Comparator, needed: &Version) -> bool {
    c.semver()
        .map_or(false, |v| v.is_prerelease() && v.same_tuple(needed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_subset(sub: &str, dom: &str, options: Options) -> bool {
        let sub = Range::parse(sub, options).unwrap();
        let dom = Range::parse(dom, options).unwrap();
        subset(&sub, &dom, options)
    }

    #[test]
    fn test_subset_cases() {
        let opts = Options::default();
        let cases = [
            ("1.2.3", "1.2.3", true),
            ("1.2.3", "1.x", true),
            ("1.2.3 1.2.4", "1.2.3", true),
            ("1.2.3 1.2.4", "1.2.9", true),
            ("1.2.3", ">1.2.0", true),
            ("1.2.3 2.3.4 || 2.3.4", "3", false),
            ("^1.2.3-pre.0", "1.x", false),
            (">2 <1", "3", true),
            ("1 || 2 || 3", ">=1.0.0", true),
            ("*", "*", true),
            ("", "*", true),
            ("*", "", true),
            ("*", ">1.2.3", false),
            ("*", ">=1.2.3", false),
            (">=1.2.3", "*", true),
            ("^2 || ^3 || ^4", ">=1", true),
            ("^2 || ^3 || ^4", ">1", true),
            ("^2 || ^3 || ^4", ">=2", true),
            ("^2 || ^3 || ^4", ">=3", false),
            (">=1", "^2 || ^3 || ^4", false),
            (">1", "^2 || ^3 || ^4", false),
            (">=1.2.3", "<2", false),
            (">=1.0.0 <=1.0.0", "1.0.0", true),
            ("1.2.3", "^1.2.0", true),
            ("^1.2.0", "1.2.3", false),
            (">=1.2.3-pre", ">=1.0.0", false),
            ("<1.2.3-0", "<1.2.3", true),
            ("~1.2.3", "^1.2.0", true),
            ("^1.2.0", "~1.2.3", false),
        ];

        for (sub, dom, expected) in cases {
            assert_eq!(is_subset(sub, dom, opts), expected, "{:?} ⊆ {:?}", sub, dom);
        }
    }

    #[test]
    fn test_subset_include_prerelease() {
        let opts = Options::include_prerelease();
        assert!(is_subset("^1.2.3-pre.0", "1.x", opts));
        assert!(is_subset(">=1.2.3-pre", ">=1.0.0", opts));
        assert!(is_subset("1.2.3-beta", "*", opts));
        assert!(!is_subset("1.2.3-beta", "*", Options::default()));
    }

    #[test]
    fn test_every_range_is_its_own_subset() {
        for range in ["^1.2.3", "~0.0.1", "1.x || >=2.5.0", ">1.0.0 <2.0.0", "*", "<0.0.0-0", "1.2.3-beta"] {
            assert!(is_subset(range, range, Options::default()), "{}", range);
        }
    }
}
