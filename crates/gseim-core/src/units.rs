//! Engineering-unit value parsing.

/// Parse a numeric value with an optional SI suffix.
///
/// Accepted suffixes (case-insensitive): `t` (1e12), `g` (1e9), `meg`
/// (1e6), `k` (1e3), `m` (1e-3), `u` (1e-6), `n` (1e-9), `p` (1e-12),
/// `f` (1e-15). A bare number (including scientific notation) parses as-is.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim().to_lowercase();

    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    // Split at the first character that cannot belong to the mantissa.
    // 'e' is ambiguous (exponent vs. nothing), so only digits/./sign/e.
    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'e')
        .unwrap_or(s.len());
    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let multiplier = match suffix {
        "t" => 1e12,
        "g" => 1e9,
        "meg" => 1e6,
        "k" => 1e3,
        "" => 1.0,
        "m" => 1e-3,
        "u" => 1e-6,
        "n" => 1e-9,
        "p" => 1e-12,
        "f" => 1e-15,
        _ => return None,
    };

    Some(value * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|v| (v - b).abs() < b.abs() * 1e-12 + 1e-30)
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_value("12"), Some(12.0));
        assert_eq!(parse_value("-0.5"), Some(-0.5));
        assert_eq!(parse_value("+5"), Some(5.0));
        assert_eq!(parse_value("2.5e-3"), Some(2.5e-3));
    }

    #[test]
    fn test_suffixes() {
        assert!(approx(parse_value("10k"), 1e4));
        assert!(approx(parse_value("4.7u"), 4.7e-6));
        assert!(approx(parse_value("1meg"), 1e6));
        assert!(approx(parse_value("100n"), 1e-7));
        assert!(approx(parse_value("1m"), 1e-3));
        assert!(approx(parse_value("2.2K"), 2.2e3));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("ohm"), None);
        assert_eq!(parse_value("10x"), None);
    }
}
