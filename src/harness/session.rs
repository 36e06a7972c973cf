use crate::error::{HarnessError, Result};
use crate::query::GroupId;
use crate::runner::{CaseHandle, RunResult, RunSummary};
use tracing::info;

/// 一个加载后的文件及其用例句柄
#[derive(Debug)]
pub struct SessionGroup {
    pub id: GroupId,

    /// 规格描述；加载失败时为 None
    pub description: Option<String>,

    /// 按声明顺序排列的用例句柄
    pub cases: Vec<CaseHandle>,

    /// 加载失败的原因，不影响其他文件
    pub load_error: Option<HarnessError>,
}

impl SessionGroup {
    pub fn is_loaded(&self) -> bool {
        self.load_error.is_none()
    }

    /// 顺序重新运行本文件的所有用例
    pub async fn run(&self) -> Result<Vec<RunResult>> {
        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            results.push(case.run().await?);
        }
        Ok(results)
    }
}

/// 一次查询加载得到的会话
#[derive(Debug)]
pub struct Session {
    groups: Vec<SessionGroup>,
    run_now: bool,
}

impl Session {
    pub(crate) fn new(groups: Vec<SessionGroup>, run_now: bool) -> Self {
        Self { groups, run_now }
    }

    pub fn groups(&self) -> &[SessionGroup] {
        &self.groups
    }

    /// 查询或配置是否要求立即运行
    pub fn run_now(&self) -> bool {
        self.run_now
    }

    /// 成功加载的 (标识符, 描述) 列表，按清单顺序
    pub fn listing(&self) -> Vec<(&GroupId, &str)> {
        self.groups
            .iter()
            .filter_map(|g| g.description.as_deref().map(|d| (&g.id, d)))
            .collect()
    }

    /// 所有用例句柄，按文件顺序再按声明顺序
    pub fn cases(&self) -> impl Iterator<Item = &CaseHandle> {
        self.groups.iter().flat_map(|g| g.cases.iter())
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    pub fn load_errors(&self) -> impl Iterator<Item = &HarnessError> {
        self.groups.iter().filter_map(|g| g.load_error.as_ref())
    }

    fn group(&self, index: usize) -> Result<&SessionGroup> {
        self.groups.get(index).ok_or_else(|| {
            HarnessError::HarnessFault(format!("no group at index {}", index))
        })
    }

    /// 运行单个用例
    pub async fn run_case(&self, group: usize, case: usize) -> Result<RunResult> {
        let handle = self.group(group)?.cases.get(case).ok_or_else(|| {
            HarnessError::HarnessFault(format!("no case at index {} in group {}", case, group))
        })?;
        handle.run().await
    }

    /// 重新运行一个文件的全部用例
    pub async fn run_group(&self, group: usize) -> Result<Vec<RunResult>> {
        self.group(group)?.run().await
    }

    /// 按迭代顺序逐个运行所有用例
    ///
    /// 单个用例失败不会中断后续用例。
    pub async fn run_all(&self) -> Result<RunSummary> {
        let mut results = Vec::with_capacity(self.case_count());
        for group in &self.groups {
            results.extend(group.run().await?);
        }

        let summary = RunSummary::from_results(&results);
        info!(
            total = summary.total,
            passed = summary.passed,
            warned = summary.warned,
            failed = summary.failed,
            "Run finished"
        );
        Ok(summary)
    }
}
