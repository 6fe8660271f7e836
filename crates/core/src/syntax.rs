//! Syntax checks for the primitive X12 data types.
//!
//! Everything here is a pure function of the value; nothing consults the
//! grammar tree or reports errors.

use x12_grammar_tables::{Charset, DataType};

/// Whether `value` is syntactically valid for `data_type` under `charset`.
///
/// `None` declares no type constraint and always passes, as does `B`.
///
/// ```
/// use x12_grammar_core::syntax::is_valid_syntax;
/// use x12_grammar_tables::{Charset, DataType};
///
/// assert!(is_valid_syntax("-5.2344", Some(DataType::Decimal), Charset::Basic));
/// assert!(!is_valid_syntax("-5.AB4", Some(DataType::Decimal), Charset::Basic));
/// assert!(!is_valid_syntax("20041340", Some(DataType::Date), Charset::Basic));
/// ```
pub fn is_valid_syntax(value: &str, data_type: Option<DataType>, charset: Charset) -> bool {
    let Some(data_type) = data_type else {
        return true;
    };
    match data_type {
        DataType::Numeric(_) => is_valid_numeric(value),
        DataType::Decimal => is_valid_decimal(value),
        DataType::Identifier | DataType::AlphaNumeric => is_valid_charset(value, charset),
        DataType::Date => is_valid_date(value),
        DataType::Time => is_valid_time(value),
        DataType::Binary => true,
    }
}

/// `-?[0-9]+`, matching the whole value.
pub fn is_valid_numeric(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?[0-9]*(\.[0-9]+)?`, matching the whole value.
pub fn is_valid_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.is_none_or(|frac| !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()))
}

/// Every character belongs to `charset`.
pub fn is_valid_charset(value: &str, charset: Charset) -> bool {
    value.chars().all(|c| in_charset(c, charset))
}

fn in_charset(c: char, charset: Charset) -> bool {
    if c.is_ascii_uppercase()
        || c.is_ascii_digit()
        || (c.is_ascii() && c.is_whitespace())
        || "!\"&'()*+,-./:;?=".contains(c)
    {
        return true;
    }
    match charset {
        Charset::Basic => false,
        Charset::Extended => c.is_ascii_lowercase() || "%~@[]_{}|<>#$".contains(c),
    }
}

/// A `CCYYMMDD` or `YYMMDD` calendar date.
///
/// Two-digit years `00`-`49` fall in the 2000s, `50`-`99` in the 1900s.
pub fn is_valid_date(value: &str) -> bool {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (year, rest) = match value.len() {
        8 => (digits(&value[..4]), &value[4..]),
        6 => {
            let yy = digits(&value[..2]);
            let century = if yy < 50 { 2000 } else { 1900 };
            (century + yy, &value[2..])
        }
        _ => return false,
    };
    let month = digits(&rest[..2]);
    let day = digits(&rest[2..4]);
    let last_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return false,
    };
    (1..=last_day).contains(&day)
}

fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// An `HHMM[SS[d..]]` time of day, at most eight digits.
pub fn is_valid_time(value: &str) -> bool {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match value.len() {
        4 | 6..=8 => {}
        _ => return false,
    }
    let hour = digits(&value[..2]);
    let minute = digits(&value[2..4]);
    if hour > 23 || minute > 59 {
        return false;
    }
    value.len() == 4 || digits(&value[4..6]) <= 59
}

// Callers guarantee `s` is non-empty ASCII digits of bounded length.
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Format named by a date/time period format qualifier (data element 1250).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeFormat {
    /// `YYMMDD`.
    D6,
    /// `CCYYMMDD`.
    D8,
    /// `CCYYMMDDHHMM`.
    DateTime,
    /// `HHMM[SS[d..]]`.
    Time,
    /// `CCYYMMDD-CCYYMMDD`, start not after end.
    RangeD8,
}

impl DateTimeFormat {
    /// Map a qualifier code to its format; unknown codes refine nothing.
    pub fn from_qualifier(code: &str) -> Option<Self> {
        match code {
            "D6" => Some(DateTimeFormat::D6),
            "D8" => Some(DateTimeFormat::D8),
            "DT" => Some(DateTimeFormat::DateTime),
            "TM" => Some(DateTimeFormat::Time),
            "RD8" => Some(DateTimeFormat::RangeD8),
            _ => None,
        }
    }

    /// Whether the format describes a time rather than a date.
    pub fn is_time(self) -> bool {
        self == DateTimeFormat::Time
    }

    /// Whether `value` conforms to this format.
    pub fn is_valid(self, value: &str) -> bool {
        match self {
            DateTimeFormat::D6 => value.len() == 6 && is_valid_date(value),
            DateTimeFormat::D8 => value.len() == 8 && is_valid_date(value),
            DateTimeFormat::DateTime => {
                value.len() == 12
                    && value.is_ascii()
                    && is_valid_date(&value[..8])
                    && is_valid_time(&value[8..])
            }
            DateTimeFormat::Time => is_valid_time(value),
            DateTimeFormat::RangeD8 => match value.split_once('-') {
                Some((start, end)) => {
                    DateTimeFormat::D8.is_valid(start)
                        && DateTimeFormat::D8.is_valid(end)
                        && start <= end
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric() {
        assert!(is_valid_numeric("0"));
        assert!(is_valid_numeric("-12"));
        assert!(is_valid_numeric("0398090"));
        assert!(!is_valid_numeric(""));
        assert!(!is_valid_numeric("-"));
        assert!(!is_valid_numeric("1.5"));
        assert!(!is_valid_numeric("12A"));
        assert!(!is_valid_numeric(" 12"));
    }

    #[test]
    fn decimal() {
        assert!(is_valid_decimal("-5.2344"));
        assert!(is_valid_decimal("-5.23442673245673345"));
        assert!(is_valid_decimal(".5"));
        assert!(is_valid_decimal("42"));
        assert!(!is_valid_decimal("-5.AB4"));
        assert!(!is_valid_decimal("5."));
        assert!(!is_valid_decimal("1.2.3"));
        assert!(!is_valid_decimal("--1"));
        assert!(!is_valid_decimal("+1"));
    }

    #[test]
    fn basic_charset() {
        assert!(is_valid_charset("TEST 123", Charset::Basic));
        assert!(is_valid_charset("A!\"&'()*+,-./:;?=", Charset::Basic));
        assert!(is_valid_charset("TEST\t", Charset::Basic));
        assert!(!is_valid_charset("test", Charset::Basic));
        assert!(!is_valid_charset("A@B", Charset::Basic));
        assert!(!is_valid_charset("A\u{1}", Charset::Basic));
        assert!(!is_valid_charset("É", Charset::Basic));
    }

    #[test]
    fn extended_charset() {
        assert!(is_valid_charset("test@example.com", Charset::Extended));
        assert!(is_valid_charset("%~@[]_{}|<>#$", Charset::Extended));
        assert!(!is_valid_charset("^", Charset::Extended));
        assert!(!is_valid_charset("\\", Charset::Extended));
    }

    #[test]
    fn dates() {
        assert!(is_valid_date("20040110"));
        assert!(is_valid_date("040110"));
        assert!(!is_valid_date("20041340"));
        assert!(!is_valid_date("20042110"));
        assert!(!is_valid_date("20040100"));
        assert!(!is_valid_date("20040431"));
        assert!(is_valid_date("20040430"));
        assert!(!is_valid_date("2004011"));
        assert!(!is_valid_date("2004O110"));
        assert!(!is_valid_date("20040109-20040110"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn february_and_leap_years() {
        assert!(is_valid_date("20040229"));
        assert!(!is_valid_date("20030229"));
        assert!(!is_valid_date("19000229"));
        assert!(is_valid_date("20000229"));
        assert!(!is_valid_date("20040230"));
        assert!(is_valid_date("20030228"));
    }

    #[test]
    fn two_digit_year_window() {
        // 00 -> 2000 (leap), 49 -> 2049, 50 -> 1950, 96 -> 1996 (leap)
        assert!(is_valid_date("000229"));
        assert!(!is_valid_date("490229"));
        assert!(!is_valid_date("500229"));
        assert!(is_valid_date("960229"));
    }

    #[test]
    fn times() {
        assert!(is_valid_time("1215"));
        assert!(is_valid_time("0000"));
        assert!(is_valid_time("235959"));
        assert!(is_valid_time("1215301"));
        assert!(is_valid_time("12153012"));
        assert!(!is_valid_time("2577"));
        assert!(!is_valid_time("2400"));
        assert!(!is_valid_time("12156"));
        assert!(!is_valid_time("121560"));
        assert!(!is_valid_time("121530123"));
        assert!(!is_valid_time("12"));
        assert!(!is_valid_time("12:5"));
    }

    #[test]
    fn dispatch_by_type() {
        let b = Charset::Basic;
        assert!(is_valid_syntax("anything at all ^", None, b));
        assert!(is_valid_syntax("\u{1}\u{2}", Some(DataType::Binary), b));
        assert!(is_valid_syntax("-12", Some(DataType::Numeric(Some(2))), b));
        assert!(!is_valid_syntax("-1.2", Some(DataType::Numeric(None)), b));
        assert!(is_valid_syntax("MI", Some(DataType::Identifier), b));
        assert!(!is_valid_syntax("mi", Some(DataType::AlphaNumeric), b));
        assert!(is_valid_syntax("mi", Some(DataType::AlphaNumeric), Charset::Extended));
        assert!(is_valid_syntax("1215", Some(DataType::Time), b));
        assert!(is_valid_syntax("20040110", Some(DataType::Date), b));
    }

    #[test]
    fn date_time_formats() {
        assert_eq!(DateTimeFormat::from_qualifier("RD8"), Some(DateTimeFormat::RangeD8));
        assert_eq!(DateTimeFormat::from_qualifier("ZZ"), None);
        assert!(DateTimeFormat::Time.is_time());

        assert!(DateTimeFormat::D8.is_valid("20040110"));
        assert!(!DateTimeFormat::D8.is_valid("040110"));
        assert!(DateTimeFormat::D6.is_valid("040110"));
        assert!(!DateTimeFormat::D6.is_valid("20040110"));
        assert!(DateTimeFormat::DateTime.is_valid("200401101215"));
        assert!(!DateTimeFormat::DateTime.is_valid("200401102515"));
        assert!(!DateTimeFormat::DateTime.is_valid("20040110"));
    }

    #[test]
    fn date_ranges() {
        let rd8 = DateTimeFormat::RangeD8;
        assert!(rd8.is_valid("20050101-20050220"));
        assert!(rd8.is_valid("20050101-20050101"));
        assert!(!rd8.is_valid("20050220-20050101"));
        assert!(!rd8.is_valid("20050101-20051320"));
        assert!(!rd8.is_valid("20050101"));
        assert!(!rd8.is_valid("20050101-"));
        assert!(!rd8.is_valid("050101-050220"));
    }
}
