//! Sequencer behaviour over the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use complihr_shared::types::OrganizationId;
use futures::future::join_all;
use tokio::sync::Barrier;

use super::category::{IdCategory, ResetPolicy};
use super::error::{PatternError, SequenceError};
use super::memory::InMemorySequenceStore;
use super::service::IdSequencer;
use super::store::OrganizationProfile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Arc<InMemorySequenceStore>, IdSequencer, OrganizationId) {
    let store = Arc::new(InMemorySequenceStore::new());
    let org = OrganizationId::new();
    store.insert_organization(OrganizationProfile::new(org, "ACM", "Europe/London"));
    let sequencer = IdSequencer::new(store.clone());
    (store, sequencer, org)
}

/// Trailing digits of an identifier.
fn embedded_sequence(id: &str) -> u64 {
    let start = id
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    id[start..].parse().unwrap()
}

#[tokio::test]
async fn test_first_employee_id() {
    let (_, sequencer, org) = setup();

    let id = sequencer
        .generate_id(org, IdCategory::Employee, Some(date(2024, 4, 1)))
        .await
        .unwrap();

    assert_eq!(id.value, "ACM-EMP-2024-00001");
    assert_eq!(id.sequence, 1);
    assert!(id.scope.is_lifetime());
}

#[tokio::test]
async fn test_sequential_calls_increase_by_one() {
    let (_, sequencer, org) = setup();
    let mut seen = HashSet::new();

    for expected in 1..=50u64 {
        let id = sequencer
            .generate_id(org, IdCategory::Leave, Some(date(2024, 6, 15)))
            .await
            .unwrap();
        assert_eq!(embedded_sequence(&id.value), expected);
        assert!(seen.insert(id.value));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_calls_never_share_a_value() {
    const NUM_CALLS: usize = 200;

    let (_, sequencer, org) = setup();
    let sequencer = Arc::new(sequencer);
    let barrier = Arc::new(Barrier::new(NUM_CALLS));

    let handles = (0..NUM_CALLS).map(|_| {
        let sequencer = Arc::clone(&sequencer);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            sequencer
                .generate_id(org, IdCategory::Expense, Some(date(2024, 9, 1)))
                .await
        })
    });

    let mut sequences: Vec<u64> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().sequence)
        .collect();
    sequences.sort_unstable();

    let expected: Vec<u64> = (1..=NUM_CALLS).map(|n| n as u64).collect();
    assert_eq!(sequences, expected);
}

#[tokio::test]
async fn test_pattern_change_keeps_counting() {
    let (_, sequencer, org) = setup();
    let as_of = Some(date(2024, 2, 10));

    for _ in 0..41 {
        sequencer
            .generate_id(org, IdCategory::Employee, as_of)
            .await
            .unwrap();
    }

    sequencer
        .update_pattern(org, IdCategory::Employee, "E{SEQUENCE:6}")
        .await
        .unwrap();

    let id = sequencer
        .generate_id(org, IdCategory::Employee, as_of)
        .await
        .unwrap();
    assert_eq!(id.value, "E000042");
    assert_eq!(id.sequence, 42);
}

#[tokio::test]
async fn test_monthly_pattern_resets_each_month() {
    let (_, sequencer, org) = setup();

    let jan_1 = sequencer
        .generate_id(org, IdCategory::Payroll, Some(date(2024, 1, 31)))
        .await
        .unwrap();
    let jan_2 = sequencer
        .generate_id(org, IdCategory::Payroll, Some(date(2024, 1, 31)))
        .await
        .unwrap();
    let feb_1 = sequencer
        .generate_id(org, IdCategory::Payroll, Some(date(2024, 2, 1)))
        .await
        .unwrap();

    assert_eq!(jan_1.value, "ACM-PAY-202401-0001");
    assert_eq!(jan_2.value, "ACM-PAY-202401-0002");
    assert_eq!(feb_1.value, "ACM-PAY-202402-0001");
    assert_eq!(feb_1.scope.month, Some(2));
}

#[tokio::test]
async fn test_yearly_category_resets_each_year() {
    let (_, sequencer, org) = setup();

    let dec = sequencer
        .generate_id(org, IdCategory::Leave, Some(date(2024, 12, 31)))
        .await
        .unwrap();
    let jan = sequencer
        .generate_id(org, IdCategory::Leave, Some(date(2025, 1, 1)))
        .await
        .unwrap();

    assert_eq!(dec.value, "ACM-LV-2024-00001");
    assert_eq!(jan.value, "ACM-LV-2025-00001");
}

#[tokio::test]
async fn test_pattern_without_year_keeps_counting_across_periods() {
    let (_, sequencer, org) = setup();
    sequencer
        .update_pattern(org, IdCategory::Leave, "LV-{SEQUENCE:3}")
        .await
        .unwrap();
    sequencer
        .update_pattern(org, IdCategory::Payroll, "PR-{MONTH}-{SEQUENCE:3}")
        .await
        .unwrap();

    let dec = sequencer
        .generate_id(org, IdCategory::Leave, Some(date(2024, 12, 31)))
        .await
        .unwrap();
    let jan = sequencer
        .generate_id(org, IdCategory::Leave, Some(date(2025, 1, 1)))
        .await
        .unwrap();
    assert_eq!(dec.value, "LV-001");
    assert_eq!(jan.value, "LV-002");
    assert!(jan.scope.is_lifetime());

    let mar_2024 = sequencer
        .generate_id(org, IdCategory::Payroll, Some(date(2024, 3, 15)))
        .await
        .unwrap();
    let mar_2025 = sequencer
        .generate_id(org, IdCategory::Payroll, Some(date(2025, 3, 15)))
        .await
        .unwrap();
    assert_eq!(mar_2024.value, "PR-03-001");
    assert_eq!(mar_2025.value, "PR-03-002");
}

#[tokio::test]
async fn test_custom_month_pattern_switches_employee_to_monthly() {
    let (_, sequencer, org) = setup();
    sequencer
        .update_pattern(org, IdCategory::Employee, "{ORG}{YEAR}{MONTH}{SEQUENCE:2}")
        .await
        .unwrap();

    let mar = sequencer
        .generate_id(org, IdCategory::Employee, Some(date(2024, 3, 1)))
        .await
        .unwrap();
    let apr = sequencer
        .generate_id(org, IdCategory::Employee, Some(date(2024, 4, 1)))
        .await
        .unwrap();

    assert_eq!(mar.value, "ACM20240301");
    assert_eq!(apr.value, "ACM20240401");
}

#[tokio::test]
async fn test_unknown_organization() {
    let (_, sequencer, _) = setup();
    let missing = OrganizationId::new();

    let err = sequencer
        .generate_id(missing, IdCategory::Employee, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SequenceError::OrganizationNotFound(id) if id == missing));

    let err = sequencer
        .update_pattern(missing, IdCategory::Employee, "{SEQUENCE}")
        .await
        .unwrap_err();
    assert!(matches!(err, SequenceError::OrganizationNotFound(_)));
}

#[test]
fn test_unknown_category() {
    let err = "timesheet".parse::<IdCategory>().unwrap_err();
    assert!(matches!(err, SequenceError::UnknownCategory(_)));
}

#[tokio::test]
async fn test_inactive_organization_cannot_issue() {
    let (store, sequencer, org) = setup();
    assert!(store.set_active(org, false));

    let err = sequencer
        .generate_id(org, IdCategory::Shift, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SequenceError::OrganizationInactive(_)));

    // Previews still work.
    assert!(sequencer.preview_id(org, IdCategory::Shift, None).await.is_ok());
}

#[tokio::test]
async fn test_invalid_update_leaves_pattern_and_counter() {
    let (_, sequencer, org) = setup();
    let as_of = Some(date(2024, 5, 5));
    sequencer
        .generate_id(org, IdCategory::Expense, as_of)
        .await
        .unwrap();

    let err = sequencer
        .update_pattern(org, IdCategory::Expense, "{ORG}-{WEEK}-{SEQUENCE:3}")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SequenceError::InvalidPattern(PatternError::UnknownPlaceholder { .. })
    ));

    let id = sequencer
        .generate_id(org, IdCategory::Expense, as_of)
        .await
        .unwrap();
    assert_eq!(id.value, "ACM-EXP-2024-00002");
}

#[tokio::test]
async fn test_corrupt_stored_pattern_does_not_consume_a_value() {
    let (store, sequencer, org) = setup();
    let mut profile = OrganizationProfile::new(org, "ACM", "Europe/London");
    profile
        .patterns
        .insert(IdCategory::Leave, "{ORG}-{SEQUENCE:5".to_string());
    store.insert_organization(profile);

    let as_of = Some(date(2024, 1, 1));
    let err = sequencer
        .generate_id(org, IdCategory::Leave, as_of)
        .await
        .unwrap_err();
    assert!(matches!(err, SequenceError::InvalidPattern(_)));

    sequencer.reset_pattern(org, IdCategory::Leave).await.unwrap();
    let id = sequencer
        .generate_id(org, IdCategory::Leave, as_of)
        .await
        .unwrap();
    assert_eq!(id.sequence, 1);
}

#[tokio::test]
async fn test_preview_does_not_increment() {
    let (_, sequencer, org) = setup();
    let as_of = Some(date(2024, 7, 20));

    let preview = sequencer
        .preview_id(org, IdCategory::Shift, as_of)
        .await
        .unwrap();
    let again = sequencer
        .preview_id(org, IdCategory::Shift, as_of)
        .await
        .unwrap();
    assert_eq!(preview, again);
    assert_eq!(preview.value, "ACM-SH-20240720-001");

    let issued = sequencer
        .generate_id(org, IdCategory::Shift, as_of)
        .await
        .unwrap();
    assert_eq!(issued.value, preview.value);
}

#[tokio::test]
async fn test_legacy_counter_continues_numbering() {
    let (store, sequencer, org) = setup();
    store.set_legacy_counter(org, IdCategory::DepartmentCode, 41);

    let id = sequencer
        .generate_id(org, IdCategory::DepartmentCode, None)
        .await
        .unwrap();
    assert_eq!(id.value, "ACM-DEPT-042");
}

#[tokio::test]
async fn test_list_patterns_reports_defaults_and_overrides() {
    let (_, sequencer, org) = setup();
    sequencer
        .update_pattern(org, IdCategory::Leave, "  LV-{YYYYMMDD}-{SEQUENCE:4}  ")
        .await
        .unwrap();

    let patterns = sequencer.list_patterns(org).await.unwrap();
    assert_eq!(patterns.len(), IdCategory::ALL.len());

    let leave = patterns
        .iter()
        .find(|p| p.category == IdCategory::Leave)
        .unwrap();
    assert!(!leave.is_default);
    assert_eq!(leave.pattern.as_str(), "LV-{YYYYMMDD}-{SEQUENCE:4}");
    assert_eq!(leave.reset_policy, ResetPolicy::Monthly);

    let employee = patterns
        .iter()
        .find(|p| p.category == IdCategory::Employee)
        .unwrap();
    assert!(employee.is_default);
    assert_eq!(employee.reset_policy, ResetPolicy::Never);
}

#[tokio::test]
async fn test_reset_pattern_restores_default() {
    let (_, sequencer, org) = setup();
    let as_of = Some(date(2024, 8, 8));
    sequencer
        .update_pattern(org, IdCategory::Expense, "X{SEQUENCE}")
        .await
        .unwrap();
    let custom = sequencer
        .generate_id(org, IdCategory::Expense, as_of)
        .await
        .unwrap();
    assert_eq!(custom.value, "X1");

    let default = sequencer
        .reset_pattern(org, IdCategory::Expense)
        .await
        .unwrap();
    assert_eq!(default.as_str(), IdCategory::Expense.default_pattern());

    // The default prints the year, so it numbers in the yearly scope.
    let id = sequencer
        .generate_id(org, IdCategory::Expense, as_of)
        .await
        .unwrap();
    assert_eq!(id.value, "ACM-EXP-2024-00001");
    assert!(!id.scope.is_lifetime());
}

#[tokio::test]
async fn test_unknown_timezone_falls_back() {
    let store = Arc::new(InMemorySequenceStore::new());
    let org = OrganizationId::new();
    store.insert_organization(OrganizationProfile::new(org, "ACM", "Mars/Olympus"));
    let sequencer = IdSequencer::new(store).with_default_timezone(chrono_tz::UTC);

    let id = sequencer
        .generate_id(org, IdCategory::Employee, None)
        .await
        .unwrap();
    assert_eq!(id.sequence, 1);
    assert!(id.value.starts_with("ACM-EMP-"));
}

#[tokio::test]
async fn test_organizations_do_not_share_counters() {
    let (store, sequencer, org) = setup();
    let other = OrganizationId::new();
    store.insert_organization(OrganizationProfile::new(other, "BRT", "Europe/London"));
    let as_of = Some(date(2024, 1, 1));

    sequencer
        .generate_id(org, IdCategory::Leave, as_of)
        .await
        .unwrap();
    let id = sequencer
        .generate_id(other, IdCategory::Leave, as_of)
        .await
        .unwrap();
    assert_eq!(id.value, "BRT-LV-2024-00001");
}
