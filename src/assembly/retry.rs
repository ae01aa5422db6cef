//! 退避重试
//!
//! 只重试 [`ErrorClass::Retryable`] 的传输错误，延迟从基础值开始逐次翻倍。
//! 每次等待的时长记录在调用方提供的日志里，供报告和测试检查。

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::Config;
use crate::error::TransportError;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    /// 首次尝试之外最多再试几次
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(2000),
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_retries,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_base_delay(), config.max_retries)
    }

    /// 第 `retry` 次重试前的等待时长（从 0 开始）
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .checked_mul(2u32.saturating_pow(retry))
            .unwrap_or(Duration::MAX)
    }

    /// 执行操作，可重试的失败按策略退避
    ///
    /// # 参数
    /// - `operation`: 操作名（日志用）
    /// - `retry_log`: 每次实际等待的时长会追加到这里
    /// - `f`: 每次调用产生一次新的请求
    ///
    /// # 返回
    /// 成功结果；致命错误原样返回；重试次数用尽后返回降级为致命的最后一个错误
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        retry_log: &mut Vec<Duration>,
        mut f: F,
    ) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut retry = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry < self.max_retries => {
                    let delay = self.delay_for(retry);
                    warn!(
                        "{} 暂时失败 (尝试 {}/{}), {:?} 后重试: {}",
                        operation,
                        retry + 1,
                        self.max_retries + 1,
                        delay,
                        err.message
                    );
                    retry_log.push(delay);
                    sleep(delay).await;
                    retry += 1;
                }
                Err(err) if err.is_retryable() => {
                    warn!("{} 重试 {} 次后仍失败", operation, self.max_retries);
                    let mut err = err.into_fatal();
                    err.message = format!("{} (已重试 {} 次)", err.message, self.max_retries);
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use std::cell::Cell;

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(Duration::from_secs(u64::MAX / 2), 3);
        assert_eq!(policy.delay_for(2), Duration::MAX);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let policy = RetryPolicy::new(Duration::from_millis(5), 3);
        let calls = Cell::new(0);
        let mut log = Vec::new();

        let result = policy
            .run("op", &mut log, || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 2 {
                        Err(TransportError::from_status("op", 503, "unavailable"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(log, vec![Duration::from_millis(5), Duration::from_millis(10)]);
    }

    #[tokio::test]
    async fn test_gives_up_after_cap() {
        let policy = RetryPolicy::new(Duration::from_millis(1), 2);
        let calls = Cell::new(0);
        let mut log = Vec::new();

        let err = policy
            .run("op", &mut log, || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(TransportError::from_status("op", 429, "slow down")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.get(), 3);
        assert_eq!(log.len(), 2);
        assert_eq!(err.class, ErrorClass::Fatal);
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test]
    async fn test_fatal_not_retried() {
        let policy = RetryPolicy::new(Duration::from_millis(1), 3);
        let calls = Cell::new(0);
        let mut log = Vec::new();

        let result: Result<(), _> = policy
            .run("op", &mut log, || {
                calls.set(calls.get() + 1);
                async { Err(TransportError::from_status("op", 404, "not found")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
        assert!(log.is_empty());
    }
}
