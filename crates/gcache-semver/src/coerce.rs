//! Best-effort extraction of a version from arbitrary text

use log::trace;
use regex::Captures;

use crate::grammar::{COERCE, COERCE_FULL};
use crate::options::Options;
use crate::version::Version;

/// Pull the first (or with `rtl`, the right-most) run of up to three
/// dot-separated numbers out of `text` and read it as a version
///
/// Missing minor and patch default to `0`. With `include_prerelease` a
/// directly attached prerelease and build are kept.
pub fn coerce(text: &str, options: impl Into<Options>) -> Option<Version> {
    let options = options.into();
    let re = if options.include_prerelease { &*COERCE_FULL } else { &*COERCE };

    let caps = if options.rtl {
        rightmost(text, re)
    } else {
        re.captures(text)
    }?;

    let group = |i: usize| caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty());

    let mut coerced = format!(
        "{}.{}.{}",
        group(2)?,
        group(3).unwrap_or("0"),
        group(4).unwrap_or("0")
    );
    if options.include_prerelease {
        if let Some(pre) = group(5) {
            coerced.push('-');
            coerced.push_str(pre);
        }
        if let Some(build) = group(6) {
            coerced.push('+');
            coerced.push_str(build);
        }
    }

    trace!("coerce {:?} -> {:?}", text, coerced);
    Version::parse(&coerced, options).ok()
}

/// Scan left to right, keeping the match that ends furthest right; runs
/// ending at the same place keep their left-most start
fn rightmost<'t>(text: &'t str, re: &regex::Regex) -> Option<Captures<'t>> {
    let mut best: Option<Captures<'t>> = None;
    let mut start = 0;

    while let Some(next) = re.captures_at(text, start) {
        let best_end = best.as_ref().and_then(|caps| caps.get(0)).map(|m| m.end());
        if best_end == Some(text.len()) {
            break;
        }

        let (next_start, next_end) = match next.get(0) {
            Some(m) => (m.start(), m.end()),
            None => break,
        };
        let skip = next.get(1).map_or(0, |m| m.len()) + next.get(2).map_or(0, |m| m.len());

        if best_end != Some(next_end) {
            best = Some(next);
        }

        // resume inside the previous run so overlapping runs are seen
        start = next_start + skip;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerced(text: &str, options: Options) -> Option<String> {
        coerce(text, options).map(|v| v.to_string())
    }

    #[test]
    fn test_coerce() {
        let cases = [
            ("foo 3.4.5 bar", Some("3.4.5")),
            ("v2", Some("2.0.0")),
            ("no numbers", None),
            ("", None),
            (".1", Some("1.0.0")),
            (".1.", Some("1.0.0")),
            ("..1", Some("1.0.0")),
            (".1.1", Some("1.1.0")),
            ("1.", Some("1.0.0")),
            ("1.0", Some("1.0.0")),
            ("0", Some("0.0.0")),
            ("0.1", Some("0.1.0")),
            ("1.2.3.4", Some("1.2.3")),
            ("1.2.3.4.5.6", Some("1.2.3")),
            ("a1", Some("1.0.0")),
            ("1a", Some("1.0.0")),
            ("version 1.2.3-rc.1+build", Some("1.2.3")),
            ("v3.4 replaces v3.3.1", Some("3.4.0")),
            ("4.6.3.9.2-alpha2", Some("4.6.3")),
            ("1111111111111111", Some("1111111111111111.0.0")),
            ("11111111111111111", None),
            ("9999999999999999", None),
        ];

        for (text, expected) in cases {
            assert_eq!(coerced(text, Options::default()).as_deref(), expected, "{:?}", text);
        }
    }

    #[test]
    fn test_coerce_rtl() {
        let rtl = Options::default().with_rtl(true);
        assert_eq!(coerced("1.2.3.4", rtl).as_deref(), Some("2.3.4"));
        assert_eq!(coerced("1.2.3.4.5.6", rtl).as_deref(), Some("4.5.6"));
        assert_eq!(coerced("4.6.3.9.2-alpha2", rtl).as_deref(), Some("2.0.0"));
        assert_eq!(coerced("v3.4 replaces v3.3.1", rtl).as_deref(), Some("3.3.1"));
        assert_eq!(coerced("no numbers", rtl), None);
    }

    #[test]
    fn test_coerce_include_prerelease() {
        let opts = Options::include_prerelease();
        assert_eq!(coerced("1.2.3-rc.1+build", opts).as_deref(), Some("1.2.3-rc.1+build"));
        assert_eq!(coerced("v2-beta", opts).as_deref(), Some("2.0.0-beta"));
        assert_eq!(
            coerced("1.2.3.4-rc.1+b", opts.with_rtl(true)).as_deref(),
            Some("2.3.4-rc.1+b")
        );
    }
}
