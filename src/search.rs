//! Address-scoped policy search.
//!
//! Resolves the address to a region code, pages through the policy search
//! API one page at a time, drops expired and non-youth policies and returns
//! the most viewed ones.

use crate::errors::{AppError, ResultExt};
use crate::models::{sort_by_inquiry_count, PolicySummary, RawPolicyRow};
use crate::services::{AddressResolver, PolicyApiService};
use chrono::NaiveDate;

/// Hard cap on rows accumulated across pages.
pub const MAX_ROWS: usize = 200;
/// Maximum number of policies returned to the caller.
pub const MAX_RESULTS: usize = 20;
/// Only names containing this marker are youth-targeted policies.
pub const YOUTH_MARKER: &str = "청년";

/// Outcome of an address search. `Empty` is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Policies(Vec<PolicySummary>),
    Empty,
}

/// Derives the policy-name keyword from the second token of `address`.
///
/// A trailing 시/군 is always stripped; a trailing 구 only when the token is
/// longer than two characters, so 중구 or 남구 stay whole.
pub fn derive_keyword(address: &str) -> String {
    let Some(second) = address.split_whitespace().nth(1) else {
        return String::new();
    };

    let len = second.chars().count();
    let strip_last = second.ends_with('시')
        || second.ends_with('군')
        || (second.ends_with('구') && len > 2);

    if strip_last {
        second.chars().take(len - 1).collect()
    } else {
        second.to_string()
    }
}

/// Parses the end date of an application period like `"20250101 ~ 20251231"`.
///
/// Returns `None` for anything other than a strict 8-digit date after the `~`.
pub fn parse_end_date(period: &str) -> Option<NaiveDate> {
    let end = period.split('~').nth(1)?.trim();
    if end.len() != 8 || !end.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(end, "%Y%m%d").ok()
}

/// Whether a row is still open on `today` and targets youth.
pub fn is_visible(row: &RawPolicyRow, today: NaiveDate) -> bool {
    let open = row
        .application_period
        .as_deref()
        .and_then(parse_end_date)
        .map_or(true, |end| end >= today);
    open && row.name().contains(YOUTH_MARKER)
}

/// Filters, ranks and truncates fetched rows.
pub fn select_policies(rows: &[RawPolicyRow], today: NaiveDate) -> Vec<PolicySummary> {
    let mut policies: Vec<PolicySummary> = rows
        .iter()
        .filter(|row| {
            let keep = is_visible(row, today);
            if !keep {
                tracing::trace!(
                    "Dropping policy {} ({})",
                    row.identifier.as_deref().unwrap_or("?"),
                    row.name()
                );
            }
            keep
        })
        .map(|row| PolicySummary::from_row(row, None))
        .collect();

    sort_by_inquiry_count(&mut policies);
    policies.truncate(MAX_RESULTS);
    policies
}

/// Pages through the search API until a page comes back empty or
/// `MAX_ROWS` matching rows have been collected.
///
/// Only rows whose region codes start with `region_code` are kept.
pub async fn fetch_region_rows(
    policy_api: &PolicyApiService,
    region_code: &str,
    keyword: &str,
) -> Result<Vec<RawPolicyRow>, AppError> {
    let mut all_rows = Vec::new();
    let mut page = 1;

    while all_rows.len() < MAX_ROWS {
        let rows = policy_api
            .fetch_page(region_code, keyword, page)
            .await
            .with_context(|| format!("Fetching policy page {}", page))?;
        if rows.is_empty() {
            break;
        }
        all_rows.extend(
            rows.into_iter()
                .filter(|row| row.region_codes().starts_with(region_code)),
        );
        page += 1;
    }

    all_rows.truncate(MAX_ROWS);
    Ok(all_rows)
}

/// Full address search: resolve, page, filter, rank.
pub async fn search_policies(
    resolver: &AddressResolver,
    policy_api: &PolicyApiService,
    address: &str,
    today: NaiveDate,
) -> Result<SearchOutcome, AppError> {
    let region_code = resolver
        .resolve(address)
        .await
        .context("Resolving address")?;
    let keyword = derive_keyword(address);

    let rows = fetch_region_rows(policy_api, &region_code, &keyword).await?;
    if rows.is_empty() {
        return Ok(SearchOutcome::Empty);
    }

    let fetched = rows.len();
    let policies = select_policies(&rows, today);
    tracing::debug!(
        "Address search kept {}/{} rows (region='{}', keyword='{}')",
        policies.len(),
        fetched,
        region_code,
        keyword
    );

    if policies.is_empty() {
        Ok(SearchOutcome::Empty)
    } else {
        Ok(SearchOutcome::Policies(policies))
    }
}
