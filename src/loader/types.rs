use crate::error::{HarnessError, Result};
use crate::generator::CaseGenerator;
use crate::loader::source::SpecSource;
use crate::query::{CaseName, GroupId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 加载后的规格（一个文件或纯分组节点）
#[derive(Debug, Clone)]
pub struct Specification {
    /// 描述文本
    pub description: String,

    /// 用例生成器；None 表示没有可直接运行用例的分组节点
    pub generator: Option<CaseGenerator>,
}

impl Specification {
    /// 纯分组节点
    pub fn group(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            generator: None,
        }
    }

    pub fn with_cases(description: impl Into<String>, generator: CaseGenerator) -> Self {
        Self {
            description: description.into(),
            generator: Some(generator),
        }
    }

    /// 声明的用例数量
    pub fn case_count(&self) -> usize {
        self.generator.as_ref().map_or(0, CaseGenerator::len)
    }
}

/// `SpecLoader::load_from` 产生的条目：标识符立即可用，规格在 `load()` 时才获取
#[derive(Clone)]
pub struct LoadEntry {
    id: GroupId,
    filter: Vec<CaseName>,
    source: Arc<dyn SpecSource>,
}

impl fmt::Debug for LoadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadEntry")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish()
    }
}

impl LoadEntry {
    pub(crate) fn new(id: GroupId, filter: Vec<CaseName>, source: Arc<dyn SpecSource>) -> Self {
        Self { id, filter, source }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// 查询指定的用例；为空表示文件内的全部用例
    pub fn filter(&self) -> &[CaseName] {
        &self.filter
    }

    pub(crate) fn widen(&mut self, filter: Option<CaseName>) {
        match filter {
            // 已经选中全部用例
            _ if self.filter.is_empty() => {}
            None => self.filter.clear(),
            Some(case) => {
                if !self.filter.contains(&case) {
                    self.filter.push(case);
                }
            }
        }
    }

    /// 该条目是否选中某个用例
    pub fn selects(&self, case: &CaseName) -> bool {
        self.filter.is_empty() || self.filter.iter().any(|f| f.selects(case))
    }

    /// 获取规格。失败只影响本条目。
    pub async fn load(&self) -> Result<Specification> {
        debug!(id = %self.id, "Loading specification");
        self.source
            .load(&self.id)
            .await
            .map_err(|e| HarnessError::SpecificationLoadFailure {
                id: self.id.to_string(),
                message: format!("{:#}", e),
            })
    }
}
