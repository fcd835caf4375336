// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::ExtractionSettings;
use crate::domain::models::activity::RawCandidate;
use crate::engines::stats::{ExtractionStats, ExtractionStatsSnapshot};
use crate::engines::traits::{ExtractionEngine, ExtractionError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const ENGINE_NAME: &str = "firecrawl";

const EXTRACTION_PROMPT: &str = "Extract every family-friendly activity, event, class, camp or \
venue listed on this page. Include the title, a short description, the category, the age groups \
it is suitable for, its schedule, its location, its pricing and a registration link if present.";

/// Firecrawl 提取引擎
///
/// 调用 `POST {base_url}/v1/scrape`，以结构化提取模式获取页面上的活动列表。
pub struct FirecrawlEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    stats: Arc<ExtractionStats>,
}

#[derive(Debug, Deserialize)]
struct ScrapeApiResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeApiData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeApiData {
    extract: Option<Value>,
    metadata: Option<ScrapeApiMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeApiMetadata {
    credits_used: Option<u64>,
}

impl FirecrawlEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 提取服务配置
    /// * `stats` - 调用方持有的统计对象
    pub fn new(
        settings: &ExtractionSettings,
        stats: Arc<ExtractionStats>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("activityrs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            stats,
        })
    }

    /// 活动列表的提取模式
    fn extraction_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "activities": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "category": { "type": "string" },
                            "subcategory": { "type": "string" },
                            "type": {
                                "type": "string",
                                "enum": ["event", "venue", "program", "class", "camp", "attraction"]
                            },
                            "ageGroups": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "category": { "type": "string" },
                                        "minAge": { "type": "integer" },
                                        "maxAge": { "type": "integer" }
                                    }
                                }
                            },
                            "schedule": {
                                "type": "object",
                                "properties": {
                                    "startDate": { "type": "string" },
                                    "startTime": { "type": "string" },
                                    "endDate": { "type": "string" },
                                    "endTime": { "type": "string" }
                                }
                            },
                            "location": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "address": { "type": "string" },
                                    "city": { "type": "string" }
                                }
                            },
                            "pricing": {
                                "type": "object",
                                "properties": {
                                    "type": { "type": "string" },
                                    "description": { "type": "string" }
                                }
                            },
                            "registrationUrl": { "type": "string" }
                        },
                        "required": ["title"]
                    }
                }
            },
            "required": ["activities"]
        })
    }

    /// 发送一次提取请求，返回候选活动和消耗的额度
    async fn request(
        &self,
        api_key: &str,
        url: &str,
    ) -> Result<(Vec<RawCandidate>, u64), ExtractionError> {
        let body = json!({
            "url": url,
            "formats": ["extract"],
            "extract": {
                "schema": Self::extraction_schema(),
                "prompt": EXTRACTION_PROMPT,
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::from_reqwest(url, e))?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::PAYMENT_REQUIRED | StatusCode::FORBIDDEN
        ) {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Unavailable {
                url: url.to_string(),
                reason: format!("{} {}", status.as_u16(), message),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ScrapeApiResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Malformed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !parsed.success {
            return Err(ExtractionError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message: parsed
                    .error
                    .unwrap_or_else(|| "service reported failure".to_string()),
            });
        }

        let data = parsed.data.ok_or_else(|| ExtractionError::Malformed {
            url: url.to_string(),
            reason: "response has no data".to_string(),
        })?;

        let credits = data
            .metadata
            .and_then(|metadata| metadata.credits_used)
            .unwrap_or(1);

        let activities = data
            .extract
            .and_then(|mut extract| extract.get_mut("activities").map(Value::take))
            .filter(|value| !value.is_null())
            .map(serde_json::from_value::<Vec<RawCandidate>>)
            .transpose()
            .map_err(|e| ExtractionError::Malformed {
                url: url.to_string(),
                reason: format!("activities: {}", e),
            })?
            .unwrap_or_default();

        Ok((activities, credits))
    }
}

#[async_trait]
impl ExtractionEngine for FirecrawlEngine {
    async fn extract(&self, url: &str) -> Result<Vec<RawCandidate>, ExtractionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ExtractionError::Unavailable {
                url: url.to_string(),
                reason: "extraction API key not configured".to_string(),
            })?;

        debug!(url, "Requesting structured extraction");
        let start = Instant::now();

        match self.request(api_key, url).await {
            Ok((activities, credits)) => {
                self.stats.record_success(
                    ENGINE_NAME,
                    start.elapsed(),
                    credits,
                    activities.len() as u64,
                );
                if activities.is_empty() {
                    info!(url, "Nothing found");
                } else {
                    info!(url, count = activities.len(), "Activities extracted");
                }
                Ok(activities)
            }
            Err(e) => {
                self.stats.record_failure(ENGINE_NAME, start.elapsed());
                warn!(url, error = %e, "Extraction failed");
                Err(e)
            }
        }
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_none() {
            return false;
        }

        match self.client.get(&self.base_url).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                debug!(error = %e, "Extraction service probe failed");
                false
            }
        }
    }

    fn stats(&self) -> ExtractionStatsSnapshot {
        self.stats.snapshot()
    }

    fn name(&self) -> &'static str {
        ENGINE_NAME
    }
}

#[cfg(test)]
#[path = "firecrawl_engine_test.rs"]
mod tests;
