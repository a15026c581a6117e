//! Property-based tests for pattern parsing and rendering.

use chrono::NaiveDate;
use complihr_shared::types::OrganizationId;
use proptest::prelude::*;

use super::category::IdCategory;
use super::pattern::{IdPattern, MAX_PATTERN_LENGTH, MAX_SEQUENCE_WIDTH, RenderContext};
use super::scope::SequenceScope;

/// Literal text containing no braces.
fn arb_literal() -> impl Strategy<Value = String> {
    "[A-Za-z0-9/_ .-]{0,20}"
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2200, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The sequence is zero-padded to the width and never truncated.
    #[test]
    fn prop_sequence_padding(value in any::<u64>(), width in 1usize..=MAX_SEQUENCE_WIDTH) {
        let pattern = IdPattern::parse(&format!("{{SEQUENCE:{width}}}")).unwrap();
        let rendered = pattern.render(&RenderContext {
            organization_code: "ACM",
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            sequence: value,
        });

        let digits = value.to_string().len();
        prop_assert_eq!(rendered.len(), digits.max(width));
        prop_assert_eq!(rendered.parse::<u64>().unwrap(), value);
    }

    /// Literal text around placeholders is preserved verbatim.
    #[test]
    fn prop_literals_preserved(
        prefix in arb_literal(),
        suffix in arb_literal(),
        date in arb_date(),
        value in 0u64..1_000_000,
    ) {
        let pattern = IdPattern::parse(&format!("{prefix}{{ORG}}{{SEQUENCE}}{suffix}")).unwrap();
        let rendered = pattern.render(&RenderContext {
            organization_code: "HR",
            date,
            sequence: value,
        });
        prop_assert_eq!(rendered, format!("{prefix}HR{value}{suffix}"));
    }

    /// Date placeholders agree with each other.
    #[test]
    fn prop_date_components_consistent(date in arb_date()) {
        let pattern = IdPattern::parse("{YEAR}{MONTH}|{YYYYMMDD}|{SEQUENCE}").unwrap();
        let rendered = pattern.render(&RenderContext {
            organization_code: "",
            date,
            sequence: 0,
        });
        let parts: Vec<&str> = rendered.split('|').collect();
        prop_assert!(parts[1].starts_with(parts[0]));
        prop_assert_eq!(parts[1].len(), 8);
    }

    /// Parsing arbitrary input never panics, and accepted patterns respect the limits.
    #[test]
    fn prop_parse_total(source in "\\PC{0,120}") {
        if let Ok(pattern) = IdPattern::parse(&source) {
            prop_assert!(
                pattern.as_str().chars().count() <= MAX_PATTERN_LENGTH,
                "accepted pattern exceeds the length limit"
            );
            prop_assert!(
                pattern.as_str().contains("{SEQUENCE"),
                "accepted pattern lacks a sequence placeholder"
            );
        }
    }

    /// Two scopes that number independently never print the same identifier.
    #[test]
    fn prop_separate_scopes_render_distinct(
        source in prop::sample::select(vec![
            "LV-{SEQUENCE:3}",
            "PR-{MONTH}-{SEQUENCE:3}",
            "{YEAR}-{SEQUENCE}",
            "{YEAR}{MONTH}{SEQUENCE:2}",
            "{MONTH}/{YEAR}/{SEQUENCE}",
            "{YYYYMMDD}{SEQUENCE}",
        ]),
        category in prop::sample::select(IdCategory::ALL.to_vec()),
        a in arb_date(),
        b in arb_date(),
    ) {
        let pattern = IdPattern::parse(source).unwrap();
        let policy = pattern.reset_policy(category);
        let org = OrganizationId::new();
        prop_assume!(
            SequenceScope::for_date(org, category, policy, a)
                != SequenceScope::for_date(org, category, policy, b)
        );

        let render = |date: NaiveDate| {
            pattern.render(&RenderContext {
                organization_code: "ACM",
                date,
                sequence: 1,
            })
        };
        prop_assert_ne!(render(a), render(b));
    }
}
