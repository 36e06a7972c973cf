use crate::query::CaseName;
use std::sync::{Arc, Mutex, PoisonError};

pub(crate) const WARN_PREFIX: &str = "WARN: ";
pub(crate) const FAIL_PREFIX: &str = "FAIL: ";

/// 用例体在一次执行中收集到的输出
#[derive(Debug, Default)]
pub(crate) struct CaseOutput {
    pub lines: Vec<String>,
    pub warned: bool,
    pub failed: bool,
}

/// 传给用例体的上下文：参数读取与诊断日志
///
/// 每次 `run()` 都会创建新的上下文，不同执行之间不共享状态。
#[derive(Debug, Clone)]
pub struct CaseContext {
    case: CaseName,
    output: Arc<Mutex<CaseOutput>>,
}

impl CaseContext {
    pub(crate) fn new(case: CaseName) -> Self {
        Self {
            case,
            output: Arc::new(Mutex::new(CaseOutput::default())),
        }
    }

    pub fn case(&self) -> &CaseName {
        &self.case
    }

    /// 获取用例参数
    pub fn param(&self, key: &str) -> Option<&str> {
        self.case
            .params()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn push(&self, line: String) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .push(line);
    }

    /// 输出一行诊断日志
    pub fn log(&self, message: impl Into<String>) {
        self.push(message.into());
    }

    /// 可恢复的问题：用例继续执行，结果为 warn
    pub fn warn(&self, message: impl AsRef<str>) {
        self.push(format!("{}{}", WARN_PREFIX, message.as_ref()));
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .warned = true;
    }

    /// 断言失败但不中断用例体，结果为 fail
    pub fn fail(&self, message: impl AsRef<str>) {
        self.push(format!("{}{}", FAIL_PREFIX, message.as_ref()));
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failed = true;
    }

    /// 条件不成立时记录失败，返回条件本身
    pub fn expect(&self, condition: bool, message: impl AsRef<str>) -> bool {
        if !condition {
            self.fail(message);
        }
        condition
    }

    /// 取出收集到的输出
    pub(crate) fn take_output(&self) -> CaseOutput {
        std::mem::take(&mut *self.output.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
