//! Price text parsing and display

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use std::str::FromStr;

/// Map a Bengali digit (০..৯) to its ASCII counterpart
fn ascii_digit(c: char) -> char {
    match c {
        '০'..='৯' => char::from(b'0' + (c as u32 - '০' as u32) as u8),
        other => other,
    }
}

/// Parse a display price such as `"১,৬৫০"`, `"৳১,৬৫০/-"` or `"৳ 1,650.00"`.
///
/// Bengali digits become ASCII, then everything except digits, `.` and
/// `-` is dropped. The longest leading number of the form
/// `-?digits(.digits)?` is the price, so trailing `-` or a second `.` are
/// ignored. Input without a leading number yields zero.
pub fn parse_price(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .map(ascii_digit)
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned)
        .and_then(|number| Decimal::from_str(&number).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Longest prefix of `s` of the form `-?digits(.digits)?`; either digit
/// run may be empty but not both. `".5"` comes back as `"0.5"`.
fn leading_number(s: &str) -> Option<String> {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (int, tail) = rest.split_at(int_len);
    let frac = tail
        .strip_prefix('.')
        .map(|after| &after[..after.bytes().take_while(u8::is_ascii_digit).count()])
        .unwrap_or_default();

    match (int.is_empty(), frac.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("{sign}{int}")),
        (true, false) => Some(format!("{sign}0.{frac}")),
        (false, false) => Some(format!("{sign}{int}.{frac}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bengali_digits_and_separators() {
        assert_eq!(parse_price("১,৬৫০"), Decimal::from(1650));
        assert_eq!(parse_price("২,৩৫০"), Decimal::from(2350));
        assert_eq!(parse_price("৳ ১২৩.৫০"), Decimal::new(12350, 2));
    }

    #[test]
    fn ascii_and_currency_text() {
        assert_eq!(parse_price("1650"), Decimal::from(1650));
        assert_eq!(parse_price("Tk 1,650.75"), Decimal::new(165075, 2));
        assert_eq!(parse_price("-20"), Decimal::from(-20));
    }

    #[test]
    fn leading_number_wins() {
        assert_eq!(parse_price("৳১,৬৫০/-"), Decimal::from(1650));
        assert_eq!(parse_price("1650-"), Decimal::from(1650));
        assert_eq!(parse_price("1.2.3"), Decimal::new(12, 1));
        assert_eq!(parse_price("1650."), Decimal::from(1650));
        assert_eq!(parse_price(".5"), Decimal::new(5, 1));
        assert_eq!(parse_price("Tk 99 - 120"), Decimal::from(99));
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("free"), Decimal::ZERO);
        assert_eq!(parse_price("--"), Decimal::ZERO);
        assert_eq!(parse_price("-.5-"), Decimal::new(-5, 1));
        assert_eq!(parse_price("."), Decimal::ZERO);
        assert_eq!(parse_price("-20"), Decimal::from(-20));
    }

    #[test]
    fn format_with_separators() {
        assert_eq!(format_amount(Decimal::from(0)), "0");
        assert_eq!(format_amount(Decimal::from(950)), "950");
        assert_eq!(format_amount(Decimal::from(3300)), "3,300");
        assert_eq!(format_amount(Decimal::from(1_234_567)), "1,234,567");
        assert_eq!(format_amount(Decimal::new(16505, 1)), "1,651");
        assert_eq!(format_amount(Decimal::from(-4200)), "-4,200");
    }
}
