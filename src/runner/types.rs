use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 用例的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pass => "pass",
            Status::Warn => "warn",
            Status::Fail => "fail",
        };
        f.write_str(s)
    }
}

/// 单次 `run()` 的执行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// 最终状态
    pub status: Status,

    /// 用例体执行的墙钟耗时（毫秒，亚毫秒精度）
    pub elapsed_millis: f64,

    /// 用例体输出的日志行；没有输出时为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

impl RunResult {
    pub fn new(status: Status, elapsed: Duration, lines: Vec<String>) -> Self {
        Self {
            status,
            elapsed_millis: elapsed.as_secs_f64() * 1000.0,
            logs: if lines.is_empty() { None } else { Some(lines) },
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }

    /// 固定小数位渲染耗时，例如 `1.2345 ms`
    pub fn elapsed_display(&self, precision: usize) -> String {
        format!("{:.*} ms", precision, self.elapsed_millis)
    }
}

/// 一组结果的统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub total_millis: f64,
}

impl RunSummary {
    pub fn from_results(results: &[RunResult]) -> Self {
        let count = |status: Status| results.iter().filter(|r| r.status == status).count();

        Self {
            total: results.len(),
            passed: count(Status::Pass),
            warned: count(Status::Warn),
            failed: count(Status::Fail),
            total_millis: results.iter().map(|r| r.elapsed_millis).sum(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.warned == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_logs_are_absent() {
        let result = RunResult::new(Status::Pass, Duration::from_micros(1500), Vec::new());
        assert_eq!(result.logs, None);
        assert!((result.elapsed_millis - 1.5).abs() < 1e-9);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "pass");
        assert!(json.get("logs").is_none());
        assert!(json.get("elapsedMillis").is_some());
    }

    #[test]
    fn test_elapsed_display() {
        let result = RunResult::new(Status::Warn, Duration::from_micros(1234), vec![]);
        assert_eq!(result.elapsed_display(4), "1.2340 ms");
        assert_eq!(result.elapsed_display(1), "1.2 ms");
    }

    #[test]
    fn test_summary() {
        let results = vec![
            RunResult::new(Status::Pass, Duration::from_millis(100), vec![]),
            RunResult::new(Status::Warn, Duration::from_millis(200), vec!["w".to_string()]),
            RunResult::new(Status::Fail, Duration::from_millis(300), vec!["f".to_string()]),
        ];

        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.warned, 1);
        assert_eq!(summary.failed, 1);
        assert!((summary.total_millis - 600.0).abs() < 1e-6);
        assert!(!summary.all_passed());
    }
}
