use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use reqwest::Client;
use std::time::Duration;

pub const POLICY_SEARCH_PATH: &str = "/go/ythip/getPlcy";
pub const RANK_PATH: &str = "/wrk/yrm/plcy/RankPlcy";
pub const ADDRESS_LOOKUP_PATH: &str = "/addrlink/addrLinkApi.do";

pub const POLICY_PAGE_SIZE: usize = 100;

const ADDRESS_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const POLICY_PAGE_TIMEOUT: Duration = Duration::from_secs(30);
const POLICY_DETAIL_TIMEOUT: Duration = Duration::from_secs(10);
const RANK_TIMEOUT: Duration = Duration::from_secs(8);

/// Length of the administrative code prefix used as the region filter.
const REGION_CODE_LEN: usize = 5;

/// Turns a non-2xx response into an `ExternalApiError` carrying the body text.
async fn ensure_success(
    response: reqwest::Response,
    api: &str,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::ExternalApiError(format!(
        "{} returned status {}: {}",
        api, status, error_text
    )))
}

/// Resolves free-text addresses to 5-digit region codes via the Juso API.
#[derive(Clone)]
pub struct AddressResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AddressResolver {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.juso_api_base_url.clone(),
            api_key: config.juso_api_key.clone(),
        }
    }

    /// Returns the region code of the best match, or `""` when nothing matches.
    pub async fn resolve(&self, address: &str) -> Result<String, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, ADDRESS_LOOKUP_PATH),
            &[
                ("confmKey", self.api_key.as_str()),
                ("currentPage", "1"),
                ("countPerPage", "1"),
                ("keyword", address),
                ("resultType", "json"),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::debug!("Resolving region code for address: {}", address);

        let response = self
            .client
            .get(url)
            .timeout(ADDRESS_LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Juso request failed: {}", e)))?;
        let response = ensure_success(response, "Juso API").await?;

        let data: JusoResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Juso response: {}", e))
        })?;

        let results = data.results.unwrap_or_default();
        if let Some(common) = &results.common {
            let code = common.error_code.as_deref().unwrap_or("0");
            if code != "0" {
                tracing::warn!(
                    "Juso API reported error {}: {}",
                    code,
                    common.error_message.as_deref().unwrap_or("")
                );
            }
        }

        let region_code = results
            .juso
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|juso| juso.adm_cd)
            .map(|adm_cd| adm_cd.chars().take(REGION_CODE_LEN).collect::<String>())
            .unwrap_or_default();

        if region_code.is_empty() {
            tracing::info!("No region code found for address: {}", address);
        } else {
            tracing::debug!("Address '{}' resolved to region {}", address, region_code);
        }
        Ok(region_code)
    }
}

/// Client for the youth policy search API: paged search and single-policy detail.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct PolicyApiService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PolicyApiService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.youth_api_base_url.clone(),
            api_key: config.youth_api_key.clone(),
        }
    }

    /// Fetches one page (1-based) of policies filtered by region code and keyword.
    pub async fn fetch_page(
        &self,
        region_code: &str,
        keyword: &str,
        page: usize,
    ) -> Result<Vec<RawPolicyRow>, AppError> {
        let page_num = page.to_string();
        let page_size = POLICY_PAGE_SIZE.to_string();
        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, POLICY_SEARCH_PATH),
            &[
                ("apiKeyNm", self.api_key.as_str()),
                ("rtnType", "json"),
                ("pageNum", page_num.as_str()),
                ("pageSize", page_size.as_str()),
                ("plcyNm", keyword),
                ("zipCd", region_code),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::debug!(
            "Fetching policy page {} (region='{}', keyword='{}', apiKeyNm=[REDACTED])",
            page,
            region_code,
            keyword
        );

        let response = self
            .client
            .get(url)
            .timeout(POLICY_PAGE_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Policy search request failed: {}", e))
            })?;
        let response = ensure_success(response, "Policy search API").await?;

        let data: PolicyListResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse policy search response: {}", e))
        })?;

        Ok(data.into_rows())
    }

    /// Fetches the detail record for one policy.
    ///
    /// `Ok(None)` means the API answered but listed no policy for `identifier`.
    pub async fn fetch_detail(
        &self,
        identifier: &PolicyIdentifier,
    ) -> Result<Option<PolicySummary>, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, POLICY_SEARCH_PATH),
            &[
                ("apiKeyNm", self.api_key.as_str()),
                ("plcyNo", identifier.0.as_str()),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .timeout(POLICY_DETAIL_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Policy detail request failed: {}", e))
            })?;
        let response = ensure_success(response, "Policy detail API").await?;

        let data: PolicyListResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse policy detail response: {}", e))
        })?;

        Ok(data
            .into_rows()
            .first()
            .map(|row| PolicySummary::from_row(row, Some(identifier.clone()))))
    }
}

/// Reads the current ranked policy identifiers from the youth center site.
#[derive(Clone)]
pub struct RankSource {
    base_url: String,
}

impl RankSource {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.youth_api_base_url.clone(),
        }
    }

    /// Primes a fresh cookie session on the site root, then reads the ranking.
    ///
    /// Identifiers come back in the order the site lists them.
    pub async fn top_identifiers(&self) -> Result<Vec<PolicyIdentifier>, AppError> {
        let session = Client::builder()
            .cookie_store(true)
            .timeout(RANK_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create rank client: {}", e)))?;

        let priming_url = format!("{}/", self.base_url);
        let priming = session.get(&priming_url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Rank session priming failed: {}", e))
        })?;
        tracing::debug!("Rank session primed with status {}", priming.status());

        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, RANK_PATH),
            &[("isMaskingYn", "Y")],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        let response = session
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Rank request failed: {}", e)))?;
        let response = ensure_success(response, "Rank API").await?;

        let data: RankResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse rank response: {}", e))
        })?;

        let identifiers = data.into_identifiers();
        tracing::info!("Rank source returned {} policy identifiers", identifiers.len());
        Ok(identifiers)
    }
}
