//! ID pattern parsing and rendering.
//!
//! A pattern mixes literal text with placeholders:
//!
//! | Placeholder | Renders as |
//! |-------------|------------|
//! | `{ORG}` | organization code |
//! | `{YEAR}` | 4-digit year |
//! | `{MONTH}` | 2-digit month |
//! | `{YYYYMMDD}` | full date |
//! | `{SEQUENCE:N}` | counter, zero-padded to width `N` (`{SEQUENCE}` is unpadded) |
//!
//! Counters wider than `N` digits are printed in full, never truncated.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::category::{IdCategory, ResetPolicy};
use super::error::PatternError;

/// Maximum pattern length in characters.
pub const MAX_PATTERN_LENGTH: usize = 100;

/// Maximum `N` in `{SEQUENCE:N}`; a `u64` never needs more digits.
pub const MAX_SEQUENCE_WIDTH: usize = 20;

const SEQUENCE_PREFIX: &str = "SEQUENCE:";
const BRACES: &[char] = &['{', '}'];

/// One parsed piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim.
    Literal(String),
    /// `{ORG}`
    OrgCode,
    /// `{YEAR}`
    Year,
    /// `{MONTH}`
    Month,
    /// `{YYYYMMDD}`
    Date,
    /// `{SEQUENCE:N}`; width 0 means unpadded.
    Sequence {
        /// Minimum number of digits.
        width: usize,
    },
}

impl Segment {
    fn from_placeholder(name: &str, position: usize) -> Result<Self, PatternError> {
        match name {
            "" => Err(PatternError::EmptyPlaceholder { position }),
            "ORG" => Ok(Self::OrgCode),
            "YEAR" => Ok(Self::Year),
            "MONTH" => Ok(Self::Month),
            "YYYYMMDD" => Ok(Self::Date),
            "SEQUENCE" => Ok(Self::Sequence { width: 0 }),
            _ => match name.strip_prefix(SEQUENCE_PREFIX) {
                Some(digits) => parse_width(digits).map(|width| Self::Sequence { width }),
                None => Err(PatternError::UnknownPlaceholder {
                    name: name.to_string(),
                }),
            },
        }
    }
}

fn parse_width(digits: &str) -> Result<usize, PatternError> {
    let invalid = || PatternError::InvalidSequenceWidth {
        value: digits.to_string(),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match digits.parse::<usize>() {
        Ok(width) if (1..=MAX_SEQUENCE_WIDTH).contains(&width) => Ok(width),
        _ => Err(invalid()),
    }
}

/// Values substituted into a pattern.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Replaces `{ORG}`.
    pub organization_code: &'a str,
    /// Drives `{YEAR}`, `{MONTH}` and `{YYYYMMDD}`.
    pub date: NaiveDate,
    /// Replaces `{SEQUENCE:N}`.
    pub sequence: u64,
}

/// A validated ID pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPattern {
    source: String,
    segments: Vec<Segment>,
}

impl IdPattern {
    /// Parses and validates a pattern.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the pattern is empty, too long, has
    /// malformed or unknown placeholders, or does not contain exactly one
    /// sequence placeholder.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let length = source.chars().count();
        if length > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                length,
                max: MAX_PATTERN_LENGTH,
            });
        }

        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(idx) = rest.find(BRACES) {
            let position = offset + idx;
            if idx > 0 {
                segments.push(Segment::Literal(rest[..idx].to_string()));
            }
            if rest[idx..].starts_with('}') {
                return Err(PatternError::UnexpectedClosingBrace { position });
            }

            let body = &rest[idx + 1..];
            let close = body
                .find(BRACES)
                .filter(|&i| body[i..].starts_with('}'))
                .ok_or(PatternError::UnterminatedPlaceholder { position })?;
            segments.push(Segment::from_placeholder(&body[..close], position)?);

            let consumed = idx + close + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        match segments
            .iter()
            .filter(|s| matches!(s, Segment::Sequence { .. }))
            .count()
        {
            0 => Err(PatternError::MissingSequence),
            1 => Ok(Self {
                source: source.to_string(),
                segments,
            }),
            _ => Err(PatternError::DuplicateSequence),
        }
    }

    /// Built-in default pattern for a category.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` only if a built-in default is malformed.
    pub fn default_for(category: IdCategory) -> Result<Self, PatternError> {
        Self::parse(category.default_pattern())
    }

    /// The pattern text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the pattern prints the month (`{MONTH}` or `{YYYYMMDD}`).
    #[must_use]
    pub fn has_month_component(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Month | Segment::Date))
    }

    /// True if the pattern prints the year (`{YEAR}` or `{YYYYMMDD}`).
    #[must_use]
    pub fn has_year_component(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Year | Segment::Date))
    }

    /// Effective reset policy.
    ///
    /// A counter may only restart when the printed date changes with it,
    /// otherwise the next period would repeat earlier identifiers:
    /// - year and month printed: monthly
    /// - only the year printed: the category default
    /// - no year printed: never
    #[must_use]
    pub fn reset_policy(&self, category: IdCategory) -> ResetPolicy {
        if !self.has_year_component() {
            ResetPolicy::Never
        } else if self.has_month_component() {
            ResetPolicy::Monthly
        } else {
            category.default_reset_policy()
        }
    }

    /// Substitutes every placeholder.
    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::OrgCode => out.push_str(ctx.organization_code),
                Segment::Year => out.push_str(&format!("{:04}", ctx.date.year())),
                Segment::Month => out.push_str(&format!("{:02}", ctx.date.month())),
                Segment::Date => out.push_str(&ctx.date.format("%Y%m%d").to_string()),
                Segment::Sequence { width } => {
                    out.push_str(&format!("{:0width$}", ctx.sequence, width = *width));
                }
            }
        }
        out
    }
}

impl fmt::Display for IdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx(sequence: u64) -> RenderContext<'static> {
        RenderContext {
            organization_code: "ACM",
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            sequence,
        }
    }

    #[test]
    fn test_employee_pattern_renders() {
        let pattern = IdPattern::parse("{ORG}-EMP-{YEAR}-{SEQUENCE:5}").unwrap();
        assert_eq!(pattern.render(&ctx(1)), "ACM-EMP-2024-00001");
    }

    #[rstest]
    #[case(7, "00007")]
    #[case(99_999, "99999")]
    #[case(123_456, "123456")]
    fn test_sequence_padding_never_truncates(#[case] value: u64, #[case] expected: &str) {
        let pattern = IdPattern::parse("{SEQUENCE:5}").unwrap();
        assert_eq!(pattern.render(&ctx(value)), expected);
    }

    #[test]
    fn test_date_placeholders() {
        let pattern = IdPattern::parse("{YYYYMMDD}/{MONTH}/{SEQUENCE}").unwrap();
        assert_eq!(pattern.render(&ctx(42)), "20240307/03/42");
    }

    #[test]
    fn test_segments_are_split() {
        let pattern = IdPattern::parse("X{ORG}-{SEQUENCE:3}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("X".into()),
                Segment::OrgCode,
                Segment::Literal("-".into()),
                Segment::Sequence { width: 3 },
            ]
        );
    }

    #[test]
    fn test_non_ascii_literals() {
        let pattern = IdPattern::parse("£-{SEQUENCE:2}-é").unwrap();
        assert_eq!(pattern.render(&ctx(3)), "£-03-é");
    }

    #[rstest]
    #[case("", PatternError::Empty)]
    #[case("   ", PatternError::Empty)]
    #[case("{ORG}-{SEQUENCE:5", PatternError::UnterminatedPlaceholder { position: 6 })]
    #[case("{ORG{SEQUENCE}}", PatternError::UnterminatedPlaceholder { position: 0 })]
    #[case("A}{SEQUENCE}", PatternError::UnexpectedClosingBrace { position: 1 })]
    #[case("{}{SEQUENCE}", PatternError::EmptyPlaceholder { position: 0 })]
    #[case("{DAY}-{SEQUENCE}", PatternError::UnknownPlaceholder { name: "DAY".into() })]
    #[case("{org}-{SEQUENCE}", PatternError::UnknownPlaceholder { name: "org".into() })]
    #[case("{SEQUENCE:0}", PatternError::InvalidSequenceWidth { value: "0".into() })]
    #[case("{SEQUENCE:21}", PatternError::InvalidSequenceWidth { value: "21".into() })]
    #[case("{SEQUENCE:+5}", PatternError::InvalidSequenceWidth { value: "+5".into() })]
    #[case("{SEQUENCE:}", PatternError::InvalidSequenceWidth { value: String::new() })]
    #[case("{ORG}-{YEAR}", PatternError::MissingSequence)]
    #[case("{SEQUENCE}{SEQUENCE:2}", PatternError::DuplicateSequence)]
    fn test_malformed_patterns(#[case] source: &str, #[case] expected: PatternError) {
        assert_eq!(IdPattern::parse(source).unwrap_err(), expected);
    }

    #[test]
    fn test_length_limit() {
        let at_limit = format!("{}{{SEQUENCE}}", "A".repeat(MAX_PATTERN_LENGTH - 10));
        assert!(IdPattern::parse(&at_limit).is_ok());

        let over = format!("{}{{SEQUENCE}}", "A".repeat(MAX_PATTERN_LENGTH - 9));
        assert_eq!(
            IdPattern::parse(&over).unwrap_err(),
            PatternError::TooLong {
                length: MAX_PATTERN_LENGTH + 1,
                max: MAX_PATTERN_LENGTH
            }
        );
    }

    #[test]
    fn test_all_defaults_parse() {
        for category in IdCategory::ALL {
            let pattern = IdPattern::parse(category.default_pattern()).unwrap();
            assert_eq!(IdPattern::default_for(category).unwrap(), pattern);
        }
    }

    #[test]
    fn test_reset_policy_follows_month_component() {
        let yearly = IdPattern::parse("{ORG}-{YEAR}-{SEQUENCE:4}").unwrap();
        assert_eq!(yearly.reset_policy(IdCategory::Leave), ResetPolicy::Yearly);
        assert_eq!(yearly.reset_policy(IdCategory::Employee), ResetPolicy::Never);

        let monthly = IdPattern::parse("{ORG}-{YEAR}{MONTH}-{SEQUENCE:4}").unwrap();
        assert_eq!(monthly.reset_policy(IdCategory::Employee), ResetPolicy::Monthly);

        let daily = IdPattern::parse("{YYYYMMDD}-{SEQUENCE:4}").unwrap();
        assert_eq!(daily.reset_policy(IdCategory::Leave), ResetPolicy::Monthly);
    }

    #[rstest]
    #[case("LV-{SEQUENCE:3}", IdCategory::Leave)]
    #[case("PR-{MONTH}-{SEQUENCE:3}", IdCategory::Payroll)]
    #[case("{ORG}{SEQUENCE}", IdCategory::Expense)]
    fn test_no_printed_year_never_resets(#[case] source: &str, #[case] category: IdCategory) {
        let pattern = IdPattern::parse(source).unwrap();
        assert!(!pattern.has_year_component());
        assert_eq!(pattern.reset_policy(category), ResetPolicy::Never);
    }
}
