// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 重投递策略
///
/// 控制被释放的队列消息多久后重新可见，以及最多被接收几次后转入死信。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大接收次数（含首次）
    pub max_receive_count: u32,
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)，为 0 时不加抖动
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_receive_count: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// 使用给定的最大接收次数创建标准策略
    pub fn with_max_receive_count(max_receive_count: u32) -> Self {
        Self {
            max_receive_count: max_receive_count.max(1),
            ..Self::default()
        }
    }

    /// 立即重投递、无抖动的策略，用于测试
    pub fn immediate(max_receive_count: u32) -> Self {
        Self {
            max_receive_count: max_receive_count.max(1),
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }

    /// 计算第 `receive_count` 次接收失败后的退避时间
    pub fn calculate_backoff(&self, receive_count: u32) -> Duration {
        let exponent = receive_count.saturating_sub(1) as i32;
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        // 限制最大退避时间
        let capped_backoff = backoff_secs.min(self.max_backoff.as_secs_f64());

        let final_backoff = if self.jitter_factor > 0.0 && capped_backoff > 0.0 {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_secs_f64(final_backoff)
    }

    /// 已接收 `receive_count` 次后是否还能再投递
    pub fn should_redeliver(&self, receive_count: u32) -> bool {
        receive_count < self.max_receive_count
    }
}
