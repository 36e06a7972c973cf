use crate::Result;
use crate::query::{CaseId, CaseName, GroupId, TestId};
use crate::results::log::ResultLog;
use crate::runner::RunResult;

/// 绑定到单个规格（文件）作用域的记录器
///
/// 由 `ResultLog::record` 创建，传给 `CaseGenerator::iterate`，
/// 用例句柄在 `run()` 完成后通过它把结果追加到正确的标识符下。
#[derive(Debug, Clone)]
pub struct SpecRecorder {
    scope: GroupId,
    log: ResultLog,
}

impl SpecRecorder {
    pub(crate) fn new(scope: GroupId, log: ResultLog) -> Self {
        Self { scope, log }
    }

    pub fn scope(&self) -> &GroupId {
        &self.scope
    }

    /// 作用域内某个用例的完整标识符
    pub fn case_id(&self, case: &CaseName) -> CaseId {
        // ResultLog::record 保证作用域路径非空
        CaseId::from_scope(self.scope.clone(), case.clone())
    }

    /// 检查日志是否仍可写入
    pub fn ensure_open(&self) -> Result<()> {
        self.log.ensure_open()
    }

    /// 追加一条结果
    pub fn append(&self, case: &CaseName, result: RunResult) -> Result<()> {
        self.log.append(TestId::Case(self.case_id(case)), result)
    }
}
