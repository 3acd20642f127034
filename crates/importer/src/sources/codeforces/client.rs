use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{ApiResponse, Contest, StandingsResult, UserInfo};
use crate::error::{ImporterError, Result};
use crate::models::{ContestSummary, Standings};
use crate::traits::StandingsProvider;

pub const DEFAULT_BASE_URL: &str = "https://codeforces.com/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CodeforcesClient {
    base_url: String,
    client: reqwest::Client,
}

impl CodeforcesClient {
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client against `base_url` whose requests give up after `timeout`.
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cf-tracker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self::with_http_client(base_url, client))
    }

    pub fn with_http_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(%url, ?query, "Calling Codeforces API");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            // Bad arguments come back as 400 with a FAILED envelope explaining why.
            if status.is_client_error()
                && status.as_u16() != 429
                && let Ok(envelope) = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                && envelope.status != "OK"
            {
                return Err(ImporterError::ApiError(
                    envelope.comment.unwrap_or(envelope.status),
                ));
            }
            return Err(ImporterError::HttpStatus(status.as_u16()));
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        envelope.into_result()
    }
}

#[async_trait::async_trait]
impl StandingsProvider for CodeforcesClient {
    async fn list_contests(&self, scope: Option<&str>) -> Result<Vec<ContestSummary>> {
        let mut query = vec![("gym", "false".to_string())];
        if let Some(group_code) = scope {
            query.push(("groupCode", group_code.to_string()));
        }

        let contests: Vec<Contest> = self.call("contest.list", &query).await?;
        Ok(contests.into_iter().map(ContestSummary::from).collect())
    }

    async fn fetch_standings(&self, contest_id: i32) -> Result<Standings> {
        let result: StandingsResult = self
            .call(
                "contest.standings",
                &[
                    ("contestId", contest_id.to_string()),
                    ("showUnofficial", "false".to_string()),
                ],
            )
            .await?;

        Ok(result.into())
    }

    async fn fetch_contest(&self, contest_id: i32) -> Result<ContestSummary> {
        let result: StandingsResult = self
            .call(
                "contest.standings",
                &[
                    ("contestId", contest_id.to_string()),
                    ("from", "1".to_string()),
                    ("count", "1".to_string()),
                ],
            )
            .await?;

        Ok(result.contest.into())
    }

    async fn lookup_user(&self, handle: &str) -> Result<bool> {
        match self
            .call::<Vec<UserInfo>>("user.info", &[("handles", handle.to_string())])
            .await
        {
            Ok(users) => Ok(!users.is_empty()),
            Err(ImporterError::ApiError(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        "Codeforces"
    }
}
