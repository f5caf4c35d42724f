//! 链接解析的重试策略

use std::time::Duration;

/// 重试策略
///
/// 只描述"最多尝试几次、每一步多久超时、重试前等多久"，
/// 不关心失败的具体原因。哪些失败可以重试由解析器决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    step_timeout: Duration,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, step_timeout: Duration, backoff: Duration) -> Self {
        Self {
            max_retries,
            step_timeout,
            backoff,
        }
    }

    /// 总尝试次数（首次 + 重试）
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// 单个导航/提取步骤的超时
    pub fn step_timeout(&self) -> Duration {
        self.step_timeout
    }

    /// 一次完整尝试的上限：打开页面、导航、提取三步
    pub fn attempt_timeout(&self) -> Duration {
        self.step_timeout.saturating_mul(3)
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// 第 `attempt` 次尝试（从 1 开始）失败后是否还能再试
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(15_000), Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_include_the_first_try() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.allows_retry_after(1));
        assert!(policy.allows_retry_after(2));
        assert!(!policy.allows_retry_after(3));

        let no_retries = RetryPolicy::new(0, Duration::from_secs(1), Duration::ZERO);
        assert_eq!(no_retries.max_attempts(), 1);
        assert!(!no_retries.allows_retry_after(1));
    }

    #[test]
    fn attempt_timeout_covers_every_step() {
        let policy = RetryPolicy::new(1, Duration::from_millis(500), Duration::from_millis(10));
        assert_eq!(policy.attempt_timeout(), Duration::from_millis(1500));
        assert_eq!(policy.backoff(), Duration::from_millis(10));
    }
}
