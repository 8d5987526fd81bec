use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::{IntoParams, ToSchema};

// ============ Domain Models ============

/// Opaque key identifying one youth policy record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyIdentifier(pub String);

impl fmt::Display for PolicyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PolicyIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A policy as exposed by both endpoints.
///
/// `identifier` is only present on items produced by enrichment; the
/// address search omits it from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PolicySummary {
    #[serde(rename = "plcyNo", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub identifier: Option<PolicyIdentifier>,
    #[serde(rename = "plcyNm")]
    pub name: String,
    #[serde(rename = "sprvsnInstCdNm")]
    pub supervising_org: String,
    #[serde(rename = "inqCnt")]
    pub inquiry_count: u64,
    /// First non-empty application/reference URL, or `""`.
    pub url: String,
}

impl PolicySummary {
    /// Builds the summary for a raw row, keeping `identifier` as given.
    pub fn from_row(row: &RawPolicyRow, identifier: Option<PolicyIdentifier>) -> Self {
        Self {
            identifier,
            name: row.name.clone().unwrap_or_default(),
            supervising_org: row.supervising_org.clone().unwrap_or_default(),
            inquiry_count: row.inquiry_count,
            url: row.application_url(),
        }
    }
}

/// Sorts by inquiry count, highest first. Equal counts keep their input order.
pub fn sort_by_inquiry_count(policies: &mut [PolicySummary]) {
    policies.sort_by(|a, b| b.inquiry_count.cmp(&a.inquiry_count));
}

// ============ Youth Center API Models ============

/// One record of `result.youthPolicyList` as the youth policy API returns it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPolicyRow {
    #[serde(rename = "plcyNo", default)]
    pub identifier: Option<String>,
    #[serde(rename = "plcyNm", default)]
    pub name: Option<String>,
    #[serde(rename = "zipCd", default)]
    pub region_codes: Option<String>,
    /// Application period, `"YYYYMMDD ~ YYYYMMDD"` when present.
    #[serde(rename = "aplyYmd", default)]
    pub application_period: Option<String>,
    #[serde(
        rename = "inqCnt",
        default,
        deserialize_with = "deserialize_inquiry_count"
    )]
    pub inquiry_count: u64,
    #[serde(rename = "sprvsnInstCdNm", default)]
    pub supervising_org: Option<String>,
    #[serde(rename = "aplyUrlAddr", default)]
    pub apply_url: Option<String>,
    #[serde(rename = "refUrlAddr1", default)]
    pub reference_url_1: Option<String>,
    #[serde(rename = "refUrlAddr2", default)]
    pub reference_url_2: Option<String>,
}

impl RawPolicyRow {
    /// First non-empty of the apply URL and the two reference URLs.
    pub fn application_url(&self) -> String {
        first_non_empty(&[
            self.apply_url.as_deref(),
            self.reference_url_1.as_deref(),
            self.reference_url_2.as_deref(),
        ])
    }

    pub fn region_codes(&self) -> &str {
        self.region_codes.as_deref().unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

pub fn first_non_empty(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| candidate.to_string())
        .unwrap_or_default()
}

/// Decodes `inqCnt` leniently: numbers and numeric strings are accepted,
/// everything else (including negatives and `null`) becomes 0.
fn deserialize_inquiry_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(inquiry_count_from_value).unwrap_or(0))
}

pub fn inquiry_count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PolicyListResponse {
    #[serde(default)]
    pub result: Option<PolicyListResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PolicyListResult {
    #[serde(rename = "youthPolicyList", default)]
    pub youth_policy_list: Option<Vec<RawPolicyRow>>,
}

impl PolicyListResponse {
    pub fn into_rows(self) -> Vec<RawPolicyRow> {
        self.result
            .and_then(|r| r.youth_policy_list)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RankResponse {
    #[serde(default)]
    pub result: Option<RankResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankResult {
    #[serde(rename = "rankPlcyList", default)]
    pub rank_plcy_list: Option<Vec<RankedPolicy>>,
}

#[derive(Debug, Deserialize)]
pub struct RankedPolicy {
    #[serde(rename = "plcyNo", deserialize_with = "deserialize_identifier")]
    pub identifier: PolicyIdentifier,
}

/// Accepts the identifier as a string or a bare number.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<PolicyIdentifier, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(PolicyIdentifier(s)),
        Value::Number(n) => Ok(PolicyIdentifier(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "plcyNo must be a string, got {}",
            other
        ))),
    }
}

impl RankResponse {
    pub fn into_identifiers(self) -> Vec<PolicyIdentifier> {
        self.result
            .and_then(|r| r.rank_plcy_list)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.identifier)
            .collect()
    }
}

// ============ Juso (Address Lookup) API Models ============

#[derive(Debug, Default, Deserialize)]
pub struct JusoResponse {
    #[serde(default)]
    pub results: Option<JusoResults>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JusoResults {
    #[serde(default)]
    pub common: Option<JusoCommon>,
    #[serde(default)]
    pub juso: Option<Vec<JusoAddress>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JusoCommon {
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JusoAddress {
    #[serde(rename = "admCd", default)]
    pub adm_cd: Option<String>,
}

// ============ HTTP API Models ============

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddressQuery {
    /// Free-text address, e.g. "광주광역시 남구"
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PoliciesResponse {
    pub policies: Vec<PolicySummary>,
}

/// Sentinel payload for a search that matched nothing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn no_content() -> Self {
        Self {
            message: "No Content".to_string(),
        }
    }
}

/// Body of `/addr/policies`: either the policy list or the "No Content" sentinel.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AddressPoliciesResponse {
    Found(PoliciesResponse),
    Empty(MessageResponse),
}
