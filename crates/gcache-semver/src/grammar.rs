//! Grammar productions shared by version, comparator and range parsing
//!
//! Every production is kept as a source string so larger productions can be
//! composed from smaller ones; the anchored forms are compiled once. Capture
//! group numbering is part of the contract, callers index into captures.
//!
//! Digits are spelled `[0-9]` because `\d` is Unicode-aware in `regex`.

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum accepted length of a version or range string
pub const MAX_LENGTH: usize = 256;

/// Largest integer a version component may hold (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Maximum number of digits coercion will read per component
pub const MAX_SAFE_COMPONENT_LENGTH: usize = 16;

const NUMERIC_IDENTIFIER: &str = r"0|[1-9][0-9]*";
const NUMERIC_IDENTIFIER_LOOSE: &str = r"[0-9]+";
const LETTER_DASH_NUMBER: &str = r"[a-zA-Z0-9-]";

lazy_static! {
    static ref NON_NUMERIC_IDENTIFIER: String = format!(r"[0-9]*[a-zA-Z-]{}*", LETTER_DASH_NUMBER);

    // major.minor.patch, three captures
    static ref MAIN_VERSION: String = format!(
        r"({n})\.({n})\.({n})",
        n = NUMERIC_IDENTIFIER
    );
    static ref MAIN_VERSION_LOOSE: String = format!(
        r"({n})\.({n})\.({n})",
        n = NUMERIC_IDENTIFIER_LOOSE
    );

    static ref PRERELEASE_IDENTIFIER: String = format!(
        r"(?:{}|{})",
        *NON_NUMERIC_IDENTIFIER, NUMERIC_IDENTIFIER
    );
    static ref PRERELEASE_IDENTIFIER_LOOSE: String = format!(
        r"(?:{}|{})",
        *NON_NUMERIC_IDENTIFIER, NUMERIC_IDENTIFIER_LOOSE
    );

    // One capture: the dot-joined identifiers without the leading hyphen
    static ref PRERELEASE: String = format!(
        r"(?:-({id}(?:\.{id})*))",
        id = *PRERELEASE_IDENTIFIER
    );
    static ref PRERELEASE_LOOSE: String = format!(
        r"(?:-?({id}(?:\.{id})*))",
        id = *PRERELEASE_IDENTIFIER_LOOSE
    );

    static ref BUILD_IDENTIFIER: String = format!(r"{}+", LETTER_DASH_NUMBER);

    // One capture: the dot-joined build identifiers without the plus
    static ref BUILD: String = format!(
        r"(?:\+({id}(?:\.{id})*))",
        id = *BUILD_IDENTIFIER
    );

    static ref FULL_PLAIN: String = format!(
        r"v?{}{}?{}?",
        *MAIN_VERSION, *PRERELEASE, *BUILD
    );
    static ref LOOSE_PLAIN: String = format!(
        r"[v=\s]*{}{}?{}?",
        *MAIN_VERSION_LOOSE, *PRERELEASE_LOOSE, *BUILD
    );

    static ref GTLT: &'static str = r"((?:<|>)?=?)";

    static ref XRANGE_IDENTIFIER: String = format!(r"{}|x|X|\*", NUMERIC_IDENTIFIER);
    static ref XRANGE_IDENTIFIER_LOOSE: String = format!(r"{}|x|X|\*", NUMERIC_IDENTIFIER_LOOSE);

    // Captures: major, minor, patch, prerelease, build
    static ref XRANGE_PLAIN: String = format!(
        r"[v=\s]*({id})(?:\.({id})(?:\.({id})(?:{pre})?{build}?)?)?",
        id = *XRANGE_IDENTIFIER,
        pre = *PRERELEASE,
        build = *BUILD
    );
    static ref XRANGE_PLAIN_LOOSE: String = format!(
        r"[v=\s]*({id})(?:\.({id})(?:\.({id})(?:{pre})?{build}?)?)?",
        id = *XRANGE_IDENTIFIER_LOOSE,
        pre = *PRERELEASE_LOOSE,
        build = *BUILD
    );

    // Captures: leading separator, major, minor, patch
    static ref COERCE_PLAIN: String = format!(
        r"(^|[^0-9])([0-9]{{1,{len}}})(?:\.([0-9]{{1,{len}}}))?(?:\.([0-9]{{1,{len}}}))?",
        len = MAX_SAFE_COMPONENT_LENGTH
    );

    static ref LONE_TILDE: &'static str = r"(?:~>?)";
    static ref LONE_CARET: &'static str = r"(?:\^)";

    /// Strict full version: captures major, minor, patch, prerelease, build
    pub static ref FULL: Regex = Regex::new(&format!(r"^{}$", *FULL_PLAIN)).unwrap();

    /// Loose full version: captures major, minor, patch, prerelease, build
    pub static ref LOOSE: Regex = Regex::new(&format!(r"^{}$", *LOOSE_PLAIN)).unwrap();

    /// A complete hyphen-led prerelease tail, used to validate increment identifiers
    pub static ref PRERELEASE_EXACT: Regex = Regex::new(&format!(r"^{}$", *PRERELEASE)).unwrap();
    pub static ref PRERELEASE_EXACT_LOOSE: Regex = Regex::new(&format!(r"^{}$", *PRERELEASE_LOOSE)).unwrap();

    /// Operator followed by an x-range: captures operator, major, minor, patch, prerelease, build
    pub static ref XRANGE: Regex = Regex::new(&format!(r"^{}\s*{}$", *GTLT, *XRANGE_PLAIN)).unwrap();
    pub static ref XRANGE_LOOSE: Regex = Regex::new(&format!(r"^{}\s*{}$", *GTLT, *XRANGE_PLAIN_LOOSE)).unwrap();

    /// First coercible run of digits
    pub static ref COERCE: Regex = Regex::new(&format!(r"{}(?:$|[^0-9])", *COERCE_PLAIN)).unwrap();

    /// Coercible run that keeps a trailing prerelease and build
    pub static ref COERCE_FULL: Regex = Regex::new(&format!(
        r"{}(?:{})?(?:{})?(?:$|[^0-9])",
        *COERCE_PLAIN, *PRERELEASE, *BUILD
    )).unwrap();

    /// `~ 1.2` becomes `~1.2`
    pub static ref TILDE_TRIM: Regex = Regex::new(&format!(r"(\s*){}\s+", *LONE_TILDE)).unwrap();
    pub static ref TILDE: Regex = Regex::new(&format!(r"^{}{}$", *LONE_TILDE, *XRANGE_PLAIN)).unwrap();
    pub static ref TILDE_LOOSE: Regex = Regex::new(&format!(r"^{}{}$", *LONE_TILDE, *XRANGE_PLAIN_LOOSE)).unwrap();

    /// `^ 1.2` becomes `^1.2`
    pub static ref CARET_TRIM: Regex = Regex::new(&format!(r"(\s*){}\s+", *LONE_CARET)).unwrap();
    pub static ref CARET: Regex = Regex::new(&format!(r"^{}{}$", *LONE_CARET, *XRANGE_PLAIN)).unwrap();
    pub static ref CARET_LOOSE: Regex = Regex::new(&format!(r"^{}{}$", *LONE_CARET, *XRANGE_PLAIN_LOOSE)).unwrap();

    /// Operator and full version, or the empty string: captures operator, version
    pub static ref COMPARATOR: Regex = Regex::new(&format!(r"^{}\s*({})$|^$", *GTLT, *FULL_PLAIN)).unwrap();
    pub static ref COMPARATOR_LOOSE: Regex = Regex::new(&format!(r"^{}\s*({})$|^$", *GTLT, *LOOSE_PLAIN)).unwrap();

    /// `> 1.2.3` becomes `>1.2.3`: captures leading space, operator, version
    pub static ref COMPARATOR_TRIM: Regex = Regex::new(&format!(
        r"(\s*){}\s*({}|{})",
        *GTLT, *LOOSE_PLAIN, *XRANGE_PLAIN
    )).unwrap();

    /// `A - B`: captures from, fM, fm, fp, fpr, fb, to, tM, tm, tp, tpr, tb
    pub static ref HYPHEN_RANGE: Regex = Regex::new(&format!(
        r"^\s*({plain})\s+-\s+({plain})\s*$",
        plain = *XRANGE_PLAIN
    )).unwrap();
    pub static ref HYPHEN_RANGE_LOOSE: Regex = Regex::new(&format!(
        r"^\s*({plain})\s+-\s+({plain})\s*$",
        plain = *XRANGE_PLAIN_LOOSE
    )).unwrap();

    /// A bare star with an optional operator
    pub static ref STAR: Regex = Regex::new(r"(<|>)?=?\s*\*").unwrap();

    /// `>=0.0.0` on its own adds nothing to a comparator set
    pub static ref GTE0: Regex = Regex::new(r"^\s*>=\s*0\.0\.0\s*$").unwrap();
    pub static ref GTE0_PRE: Regex = Regex::new(r"^\s*>=\s*0\.0\.0-0\s*$").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// A missing, `x`, `X` or `*` component of a partial version
pub fn is_x(id: Option<&str>) -> bool {
    match id {
        None => true,
        Some(id) => id.is_empty() || id.eq_ignore_ascii_case("x") || id == "*",
    }
}

/// Add one to a decimal digit string, ignoring leading zeros
pub fn increment_digits(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut bytes: Vec<u8> = trimmed.bytes().collect();
    let mut i = bytes.len();
    loop {
        if i == 0 {
            bytes.insert(0, b'1');
            break;
        }
        i -= 1;
        if bytes[i] == b'9' {
            bytes[i] = b'0';
        } else {
            bytes[i] += 1;
            break;
        }
    }
    String::from_utf8(bytes).unwrap_or_default()
}
