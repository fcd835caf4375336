// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 提取URL的主机部分作为域名
///
/// URL无法解析或没有主机时，退回使用原始字符串
pub fn domain_of(raw_url: &str) -> String {
    match Url::parse(raw_url) {
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| raw_url.to_string()),
        Err(_) => raw_url.to_string(),
    }
}

/// 对象键中使用的时间戳，避免冒号
pub fn key_timestamp(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S%.3fZ").to_string()
}
