/// Enrichment of ranked policy identifiers.
///
/// 1. Spawn one detail fetch per identifier on the shared client pool
/// 2. Wait for every task (fan-in barrier)
/// 3. Drop failed or empty slots
/// 4. Stable-sort the survivors by inquiry count
use crate::errors::AppError;
use crate::models::{sort_by_inquiry_count, PolicyIdentifier, PolicySummary};
use crate::services::{PolicyApiService, RankSource};
use futures::future::join_all;

/// Fetches details for every identifier concurrently and returns them ranked.
///
/// A failed or empty fetch contributes nothing; it is logged and dropped.
/// Results are buffered in input order before sorting, so equal counts keep
/// the identifier order regardless of which request finished first.
pub async fn enrich_policies(
    policy_api: &PolicyApiService,
    identifiers: &[PolicyIdentifier],
) -> Vec<PolicySummary> {
    if identifiers.is_empty() {
        return Vec::new();
    }

    let tasks: Vec<_> = identifiers
        .iter()
        .cloned()
        .map(|identifier| {
            let api = policy_api.clone();
            tokio::spawn(async move {
                match api.fetch_detail(&identifier).await {
                    Ok(Some(summary)) => Some(summary),
                    Ok(None) => {
                        tracing::warn!("No policy detail returned for {}", identifier);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Policy detail fetch failed ({}): {}", identifier, e);
                        None
                    }
                }
            })
        })
        .collect();

    // One slot per identifier, in input order
    let slots = join_all(tasks).await;

    let mut ranked: Vec<PolicySummary> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Policy detail task aborted: {}", e);
                None
            }
        })
        .collect();

    sort_by_inquiry_count(&mut ranked);

    tracing::debug!(
        "Enriched {}/{} ranked policies",
        ranked.len(),
        identifiers.len()
    );
    ranked
}

/// Current top policies: rank list piped into enrichment.
///
/// Fails only when the rank list itself cannot be read.
pub async fn top_policies(
    rank_source: &RankSource,
    policy_api: &PolicyApiService,
) -> Result<Vec<PolicySummary>, AppError> {
    let identifiers = rank_source.top_identifiers().await?;
    Ok(enrich_policies(policy_api, &identifiers).await)
}
