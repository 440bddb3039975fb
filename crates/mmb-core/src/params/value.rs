use std::fmt;

/// The kind of value a parameter descriptor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Integral,
    Real,
    Boolean,
    Textual,
    Options,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParamKind::Integral => "integral",
                ParamKind::Real => "real",
                ParamKind::Boolean => "boolean",
                ParamKind::Textual => "textual",
                ParamKind::Options => "options",
            }
        )
    }
}

/// A typed advanced-parameter value, one variant per descriptor kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integral(i64),
    Real(f64),
    Boolean(bool),
    Textual(String),
    Option(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Integral(_) => ParamKind::Integral,
            ParamValue::Real(_) => ParamKind::Real,
            ParamValue::Boolean(_) => ParamKind::Boolean,
            ParamValue::Textual(_) => ParamKind::Textual,
            ParamValue::Option(_) => ParamKind::Options,
        }
    }
}

/// Renders a value the way the command script expects it, booleans as the
/// literal tokens `True`/`False`.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integral(v) => write!(f, "{}", v),
            ParamValue::Real(v) => write!(f, "{}", v),
            ParamValue::Boolean(true) => write!(f, "True"),
            ParamValue::Boolean(false) => write!(f, "False"),
            ParamValue::Textual(v) | ParamValue::Option(v) => write!(f, "{}", v),
        }
    }
}

/// Parses an integral token.
///
/// Rejects the empty string and any string containing a decimal point or a
/// non-digit character after an optional leading minus.
pub fn parse_integral(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses a real token.
///
/// Accepts at most one decimal separator, taking `,` as an alternate
/// separator normalized to `.`, and rejects the empty string and any other
/// non-digit character after an optional leading minus.
pub fn parse_real(text: &str) -> Option<f64> {
    let normalized = text.replace(',', ".");
    let digits = normalized.strip_prefix('-').unwrap_or(&normalized);
    if digits.is_empty() {
        return None;
    }

    let mut seen_separator = false;
    let mut seen_digit = false;
    for b in digits.bytes() {
        match b {
            b'.' if !seen_separator => seen_separator = true,
            b'0'..=b'9' => seen_digit = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod integral {
        use super::*;

        #[test]
        fn accepts_plain_and_negative_integers() {
            assert_eq!(parse_integral("42"), Some(42));
            assert_eq!(parse_integral("-7"), Some(-7));
            assert_eq!(parse_integral("0"), Some(0));
        }

        #[test]
        fn rejects_decimals_and_garbage() {
            assert_eq!(parse_integral("4.2"), None);
            assert_eq!(parse_integral("4,2"), None);
            assert_eq!(parse_integral("42x"), None);
            assert_eq!(parse_integral("x42"), None);
            assert_eq!(parse_integral("4 2"), None);
        }

        #[test]
        fn rejects_empty_and_bare_minus() {
            assert_eq!(parse_integral(""), None);
            assert_eq!(parse_integral("-"), None);
        }
    }

    mod real {
        use super::*;

        #[test]
        fn accepts_integers_and_decimals() {
            assert_eq!(parse_real("10"), Some(10.0));
            assert_eq!(parse_real("0.05"), Some(0.05));
            assert_eq!(parse_real("-1.5"), Some(-1.5));
        }

        #[test]
        fn accepts_comma_as_decimal_separator() {
            assert_eq!(parse_real("0,5"), Some(0.5));
            assert_eq!(parse_real("-3,25"), Some(-3.25));
        }

        #[test]
        fn rejects_multiple_separators() {
            assert_eq!(parse_real("1.2.3"), None);
            assert_eq!(parse_real("1,2,3"), None);
            assert_eq!(parse_real("1.2,3"), None);
        }

        #[test]
        fn rejects_empty_exponents_and_garbage() {
            assert_eq!(parse_real(""), None);
            assert_eq!(parse_real("-"), None);
            assert_eq!(parse_real("."), None);
            assert_eq!(parse_real("1e5"), None);
            assert_eq!(parse_real("abc"), None);
        }
    }

    #[test]
    fn display_renders_script_tokens() {
        assert_eq!(ParamValue::Boolean(true).to_string(), "True");
        assert_eq!(ParamValue::Boolean(false).to_string(), "False");
        assert_eq!(ParamValue::Integral(5).to_string(), "5");
        assert_eq!(ParamValue::Real(10.0).to_string(), "10");
        assert_eq!(ParamValue::Real(0.25).to_string(), "0.25");
        assert_eq!(ParamValue::Option("Verlet".into()).to_string(), "Verlet");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ParamValue::Integral(1).kind(), ParamKind::Integral);
        assert_eq!(ParamValue::Textual(String::new()).kind(), ParamKind::Textual);
        assert_eq!(ParamValue::Option(String::new()).kind(), ParamKind::Options);
    }
}
