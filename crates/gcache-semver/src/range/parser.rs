//! Range text to comparator sets
//!
//! Each `||` segment is rewritten step by step: hyphen ranges, operator
//! spacing, carets, tildes, x-ranges and stars all become plain
//! comparators, which are then deduplicated. Results are memoized per
//! `(flags, segment)`.

use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::trace;

use crate::comparator::Comparator;
use crate::error::SemverError;
use crate::grammar::{
    collapse_whitespace, increment_digits, is_x, CARET, CARET_LOOSE, CARET_TRIM, COMPARATOR_LOOSE,
    COMPARATOR_TRIM, GTE0, GTE0_PRE, HYPHEN_RANGE, HYPHEN_RANGE_LOOSE, STAR, TILDE, TILDE_LOOSE, TILDE_TRIM,
    WHITESPACE, XRANGE, XRANGE_LOOSE,
};
use crate::options::Options;
use crate::range::cache::LruCache;
use crate::range::Range;

type SegmentKey = (u8, String);

lazy_static! {
    static ref DEFAULT_PARSER: RangeParser = RangeParser::new();
}

/// Parses range text, memoizing each `||` segment
pub struct RangeParser {
    cache: Mutex<LruCache<SegmentKey, Vec<Comparator>>>,
}

impl RangeParser {
    pub fn new() -> Self {
        Self::with_cache(LruCache::default())
    }

    /// Parser whose cached segments expire after `ttl`
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Self {
        Self::with_cache(LruCache::with_ttl(capacity, ttl))
    }

    pub fn with_cache(cache: LruCache<SegmentKey, Vec<Comparator>>) -> Self {
        RangeParser {
            cache: Mutex::new(cache),
        }
    }

    /// The process-wide parser behind [`Range::parse`]
    pub fn global() -> &'static RangeParser {
        &DEFAULT_PARSER
    }

    /// Number of cached segments
    pub fn cached(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn parse(&self, text: &str, options: impl Into<Options>) -> Result<Range, SemverError> {
        let options = options.into();
        let raw = collapse_whitespace(text);

        let mut set: Vec<Vec<Comparator>> = Vec::new();
        for segment in raw.split("||") {
            let comparators = self.parse_segment(segment.trim(), options)?;
            if !comparators.is_empty() {
                set.push(comparators);
            }
        }

        if set.is_empty() {
            return Err(SemverError::InvalidRange(raw));
        }

        if set.len() > 1 {
            let first = set[0].clone();
            set.retain(|group| !group[0].is_null_set());
            if set.is_empty() {
                set.push(first);
            } else if set.len() > 1 {
                if let Some(any) = set.iter().find(|group| group.len() == 1 && group[0].is_any()) {
                    set = vec![any.clone()];
                }
            }
        }

        Ok(Range::from_parts(raw, set, options))
    }

    fn parse_segment(&self, segment: &str, options: Options) -> Result<Vec<Comparator>, SemverError> {
        let key = (options.parse_flags(), segment.to_string());

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                trace!("range cache hit {:?}", segment);
                return Ok(hit);
            }
        }

        let text = replace_hyphen(segment, options);
        trace!("hyphen replace {:?}", text);

        let text = COMPARATOR_TRIM.replace_all(&text, "$1$2$3");
        let text = TILDE_TRIM.replace_all(&text, "$1~");
        let text = CARET_TRIM.replace_all(&text, "$1^");
        trace!("operator trim {:?}", text);

        let expanded = text
            .split(' ')
            .map(|comp| desugar_comparator(comp, options))
            .collect::<Vec<_>>()
            .join(" ");

        let mut tokens: Vec<String> = WHITESPACE
            .split(&expanded)
            .map(|comp| replace_gte0(comp, options))
            .collect();
        trace!("comparator tokens {:?}", tokens);

        if options.loose {
            tokens.retain(|comp| COMPARATOR_LOOSE.is_match(comp));
        }

        let comparators = tokens
            .iter()
            .map(|token| Comparator::parse(token, options))
            .collect::<Result<Vec<_>, _>>()?;

        let mut unique: IndexMap<String, Comparator> = IndexMap::new();
        for comparator in comparators {
            if comparator.is_null_set() {
                return Ok(vec![comparator]);
            }
            unique.insert(comparator.value().to_string(), comparator);
        }
        if unique.len() > 1 {
            unique.shift_remove("");
        }

        let result: Vec<Comparator> = unique.into_values().collect();

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, result.clone());
        }

        Ok(result)
    }
}

impl Default for RangeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// `A - B` into `>=A <=B`, widening partial bounds
fn replace_hyphen(segment: &str, options: Options) -> String {
    let re = if options.loose { &*HYPHEN_RANGE_LOOSE } else { &*HYPHEN_RANGE };
    let Some(caps) = re.captures(segment) else {
        return segment.to_string();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let z = if options.include_prerelease { "-0" } else { "" };

    let (from, f_major, f_minor, f_patch, f_pre) = (group(1), group(2), group(3), group(4), group(5));
    let (to, t_major, t_minor, t_patch, t_pre) = (group(7), group(8), group(9), group(10), group(11));

    let lower = if is_x(Some(f_major)) {
        String::new()
    } else if is_x(Some(f_minor)) {
        format!(">={}.0.0{}", f_major, z)
    } else if is_x(Some(f_patch)) {
        format!(">={}.{}.0{}", f_major, f_minor, z)
    } else if !f_pre.is_empty() {
        format!(">={}", from)
    } else {
        format!(">={}{}", from, z)
    };

    let upper = if is_x(Some(t_major)) {
        String::new()
    } else if is_x(Some(t_minor)) {
        format!("<{}.0.0-0", increment_digits(t_major))
    } else if is_x(Some(t_patch)) {
        format!("<{}.{}.0-0", t_major, increment_digits(t_minor))
    } else if !t_pre.is_empty() {
        format!("<={}.{}.{}-{}", t_major, t_minor, t_patch, t_pre)
    } else if options.include_prerelease {
        format!("<{}.{}.{}-0", t_major, t_minor, increment_digits(t_patch))
    } else {
        format!("<={}", to)
    };

    format!("{} {}", lower, upper).trim().to_string()
}

/// Expand one space-separated token: caret, tilde, x-range, then star
fn desugar_comparator(comp: &str, options: Options) -> String {
    let comp = each_word(comp, |c| replace_caret(c, options));
    trace!("caret {:?}", comp);
    let comp = each_word(&comp, |c| replace_tilde(c, options));
    trace!("tilde {:?}", comp);
    let comp = each_word(&comp, |c| replace_xrange(c, options));
    trace!("xrange {:?}", comp);
    let comp = STAR.replace(comp.trim(), "").into_owned();
    trace!("stars {:?}", comp);
    comp
}

fn each_word(comp: &str, replace: impl Fn(&str) -> String) -> String {
    WHITESPACE
        .split(comp.trim())
        .map(replace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `~1.2.3` allows patch-level changes, `~1` minor-level ones
fn replace_tilde(comp: &str, options: Options) -> String {
    let re = if options.loose { &*TILDE_LOOSE } else { &*TILDE };
    let Some(caps) = re.captures(comp) else {
        return comp.to_string();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let (major, minor, patch, pre) = (group(1), group(2), group(3), group(4));

    if is_x(Some(major)) {
        String::new()
    } else if is_x(Some(minor)) {
        format!(">={}.0.0 <{}.0.0-0", major, increment_digits(major))
    } else if is_x(Some(patch)) {
        format!(">={}.{}.0 <{}.{}.0-0", major, minor, major, increment_digits(minor))
    } else if !pre.is_empty() {
        format!(
            ">={}.{}.{}-{} <{}.{}.0-0",
            major,
            minor,
            patch,
            pre,
            major,
            increment_digits(minor)
        )
    } else {
        format!(">={}.{}.{} <{}.{}.0-0", major, minor, patch, major, increment_digits(minor))
    }
}

/// `^1.2.3` allows changes that keep the left-most nonzero component
fn replace_caret(comp: &str, options: Options) -> String {
    let re = if options.loose { &*CARET_LOOSE } else { &*CARET };
    let Some(caps) = re.captures(comp) else {
        return comp.to_string();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let (major, minor, patch, pre) = (group(1), group(2), group(3), group(4));
    let z = if options.include_prerelease { "-0" } else { "" };

    if is_x(Some(major)) {
        return String::new();
    }
    if is_x(Some(minor)) {
        return format!(">={}.0.0{} <{}.0.0-0", major, z, increment_digits(major));
    }
    if is_x(Some(patch)) {
        return if major == "0" {
            format!(">={}.{}.0{} <{}.{}.0-0", major, minor, z, major, increment_digits(minor))
        } else {
            format!(">={}.{}.0{} <{}.0.0-0", major, minor, z, increment_digits(major))
        };
    }

    let (lower, lower_z) = if pre.is_empty() {
        (format!(">={}.{}.{}", major, minor, patch), z)
    } else {
        (format!(">={}.{}.{}-{}", major, minor, patch, pre), "")
    };

    if major == "0" {
        if minor == "0" {
            format!("{}{} <{}.{}.{}-0", lower, lower_z, major, minor, increment_digits(patch))
        } else {
            format!("{}{} <{}.{}.0-0", lower, lower_z, major, increment_digits(minor))
        }
    } else {
        format!("{} <{}.0.0-0", lower, increment_digits(major))
    }
}

/// Partial versions like `1.x`, `>1.2` or `<=2` into explicit bounds
fn replace_xrange(comp: &str, options: Options) -> String {
    let comp = comp.trim();
    let re = if options.loose { &*XRANGE_LOOSE } else { &*XRANGE };
    let Some(caps) = re.captures(comp) else {
        return comp.to_string();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let (mut op, major, minor, patch) = (group(1), group(2), group(3), group(4));

    let x_major = is_x(Some(major));
    let x_minor = x_major || is_x(Some(minor));
    let x_patch = x_minor || is_x(Some(patch));
    let any_x = x_patch;

    if op == "=" && any_x {
        op = "";
    }
    let mut pre = if options.include_prerelease { "-0" } else { "" };

    if x_major {
        if op == ">" || op == "<" {
            // nothing is above or below every version
            "<0.0.0-0".to_string()
        } else {
            "*".to_string()
        }
    } else if !op.is_empty() && any_x {
        let mut major = major.to_string();
        let mut minor = if x_minor { "0".to_string() } else { minor.to_string() };
        let mut op = op;

        if op == ">" {
            // >1 => >=2.0.0, >1.2 => >=1.3.0
            op = ">=";
            if x_minor {
                major = increment_digits(&major);
                minor = "0".to_string();
            } else {
                minor = increment_digits(&minor);
            }
        } else if op == "<=" {
            // <=0.7.x is actually <0.8.0, since any 0.7.x is allowed
            op = "<";
            if x_minor {
                major = increment_digits(&major);
            } else {
                minor = increment_digits(&minor);
            }
        }

        if op == "<" {
            pre = "-0";
        }

        format!("{}{}.{}.0{}", op, major, minor, pre)
    } else if x_minor {
        format!(">={}.0.0{} <{}.0.0-0", major, pre, increment_digits(major))
    } else if x_patch {
        format!(">={}.{}.0{} <{}.{}.0-0", major, minor, pre, major, increment_digits(minor))
    } else {
        comp.to_string()
    }
}

fn replace_gte0(comp: &str, options: Options) -> String {
    let re = if options.include_prerelease { &*GTE0_PRE } else { &*GTE0 };
    re.replace(comp.trim(), "").into_owned()
}
