/// Property-based tests using proptest
/// Tests invariants of keyword derivation, URL selection, count decoding,
/// ranking order and the search filters
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::json;
use youth_policy_api::models::{
    first_non_empty, inquiry_count_from_value, sort_by_inquiry_count, PolicySummary, RawPolicyRow,
};
use youth_policy_api::search::{derive_keyword, parse_end_date, select_policies, MAX_RESULTS};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn summary(tag: usize, count: u64) -> PolicySummary {
    PolicySummary {
        identifier: None,
        name: format!("p{}", tag),
        supervising_org: String::new(),
        inquiry_count: count,
        url: String::new(),
    }
}

// Property: keyword derivation never panics and only trims one suffix char
proptest! {
    #[test]
    fn keyword_derivation_never_panics(address in "\\PC*") {
        let _ = derive_keyword(&address);
    }

    #[test]
    fn keyword_is_prefix_of_second_token(
        first in "[가-힣]{2,6}",
        second in "[가-힣]{1,6}",
        suffix in prop::sample::select(vec!["시", "군", "구", ""])
    ) {
        let token = format!("{}{}", second, suffix);
        let keyword = derive_keyword(&format!("{} {}", first, token));
        prop_assert!(token.starts_with(&keyword));
        let dropped = token.chars().count() - keyword.chars().count();
        prop_assert!(dropped <= 1);
    }

    #[test]
    fn si_and_gun_suffixes_always_stripped(
        name in "[가-힣]{1,5}",
        suffix in prop::sample::select(vec!["시", "군"])
    ) {
        let keyword = derive_keyword(&format!("경기도 {}{}", name, suffix));
        prop_assert_eq!(keyword, name);
    }

    #[test]
    fn gu_stripped_only_from_long_tokens(name in "[가-힣]{1,5}") {
        let token = format!("{}구", name);
        let keyword = derive_keyword(&format!("서울특별시 {}", token));
        if token.chars().count() > 2 {
            prop_assert_eq!(keyword, name);
        } else {
            prop_assert_eq!(keyword, token);
        }
    }
}

// Property: URL is the first non-empty candidate, else ""
proptest! {
    #[test]
    fn url_is_first_non_empty_candidate(
        a in prop::option::of("[a-z]{0,3}"),
        b in prop::option::of("[a-z]{0,3}"),
        c in prop::option::of("[a-z]{0,3}")
    ) {
        let row = RawPolicyRow {
            apply_url: a.clone(),
            reference_url_1: b.clone(),
            reference_url_2: c.clone(),
            ..Default::default()
        };
        let expected = [a, b, c]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        prop_assert_eq!(row.application_url(), expected.clone());
        prop_assert_eq!(first_non_empty(&[None, Some(""), None]), "");
    }
}

// Property: inquiry counts decode to the number or to zero
proptest! {
    #[test]
    fn numeric_string_counts_round_trip(n in any::<u32>()) {
        prop_assert_eq!(inquiry_count_from_value(&json!(n.to_string())), n as u64);
        prop_assert_eq!(inquiry_count_from_value(&json!(n)), n as u64);
    }

    #[test]
    fn non_numeric_counts_are_zero(s in "[a-zA-Z가-힣]{1,8}") {
        prop_assert_eq!(inquiry_count_from_value(&json!(s)), 0);
    }
}

// Property: ranking is descending and stable
proptest! {
    #[test]
    fn ranking_is_descending_and_stable(counts in prop::collection::vec(0u64..5, 0..30)) {
        let mut policies: Vec<PolicySummary> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| summary(i, *c))
            .collect();
        sort_by_inquiry_count(&mut policies);

        prop_assert_eq!(policies.len(), counts.len());
        for pair in policies.windows(2) {
            prop_assert!(pair[0].inquiry_count >= pair[1].inquiry_count);
            if pair[0].inquiry_count == pair[1].inquiry_count {
                let i: usize = pair[0].name[1..].parse().unwrap();
                let j: usize = pair[1].name[1..].parse().unwrap();
                prop_assert!(i < j);
            }
        }
    }

    #[test]
    fn dropping_items_does_not_reorder_survivors(
        counts in prop::collection::vec(0u64..5, 1..20),
        keep in prop::collection::vec(any::<bool>(), 20)
    ) {
        let all: Vec<PolicySummary> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| summary(i, *c))
            .collect();

        let mut full = all.clone();
        sort_by_inquiry_count(&mut full);
        let expected: Vec<_> = full
            .into_iter()
            .filter(|p| keep[p.name[1..].parse::<usize>().unwrap()])
            .collect();

        let mut partial: Vec<_> = all
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep[*i])
            .map(|(_, p)| p)
            .collect();
        sort_by_inquiry_count(&mut partial);

        prop_assert_eq!(partial, expected);
    }
}

// Property: search selection honours the result cap and end dates
proptest! {
    #[test]
    fn selection_caps_results_and_drops_expired(
        rows in prop::collection::vec(
            (any::<bool>(), -400i64..400, any::<bool>(), 0u64..1000),
            0..80
        )
    ) {
        let rows: Vec<RawPolicyRow> = rows
            .into_iter()
            .map(|(youth, offset, dated, count)| {
                let end = today() + Duration::days(offset);
                RawPolicyRow {
                    name: Some(if youth { "청년 지원".into() } else { "일반 지원".into() }),
                    application_period: dated
                        .then(|| format!("20200101 ~ {}", end.format("%Y%m%d"))),
                    inquiry_count: count,
                    ..Default::default()
                }
            })
            .collect();

        let policies = select_policies(&rows, today());
        prop_assert!(policies.len() <= MAX_RESULTS);
        prop_assert!(policies.iter().all(|p| p.name.contains("청년")));
        for pair in policies.windows(2) {
            prop_assert!(pair[0].inquiry_count >= pair[1].inquiry_count);
        }

        let survivors = rows
            .iter()
            .filter(|r| r.name().contains("청년"))
            .filter(|r| {
                r.application_period
                    .as_deref()
                    .and_then(parse_end_date)
                    .map_or(true, |end| end >= today())
            })
            .count();
        prop_assert_eq!(policies.len(), survivors.min(MAX_RESULTS));
    }

    #[test]
    fn end_date_parser_never_panics(period in "\\PC*") {
        let _ = parse_end_date(&period);
    }
}
