use crate::error::{HarnessError, Result};
use crate::generator::context::CaseContext;
use crate::query::CaseName;
use crate::results::SpecRecorder;
use crate::runner::CaseHandle;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// 用例体返回的 future
pub type CaseFuture = BoxFuture<'static, anyhow::Result<()>>;

/// 用例体：每次执行都以新的上下文调用
pub type CaseBody = Arc<dyn Fn(CaseContext) -> CaseFuture + Send + Sync>;

/// 单个声明的用例
#[derive(Clone)]
pub struct CaseDef {
    pub name: CaseName,
    pub body: CaseBody,
}

impl fmt::Debug for CaseDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseDef").field("name", &self.name).finish()
    }
}

fn boxed_body<F, Fut>(body: F) -> CaseBody
where
    F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| body(ctx).boxed())
}

/// 按声明顺序保存用例的生成器
#[derive(Debug, Clone, Default)]
pub struct CaseGenerator {
    cases: Vec<CaseDef>,
}

impl CaseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明一个用例
    ///
    /// 同一生成器内用例名必须唯一，否则两个用例会共用一个标识符。
    pub fn case<F, Fut>(mut self, name: CaseName, body: F) -> Result<Self>
    where
        F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.push(name, boxed_body(body))?;
        Ok(self)
    }

    /// 为每个参数组合声明一个用例，共享同一个用例体
    pub fn parameterized<I, F, Fut>(mut self, variants: I, body: F) -> Result<Self>
    where
        I: IntoIterator<Item = CaseName>,
        F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let body = boxed_body(body);
        for name in variants {
            self.push(name, body.clone())?;
        }
        Ok(self)
    }

    fn push(&mut self, name: CaseName, body: CaseBody) -> Result<()> {
        if self.cases.iter().any(|def| def.name == name) {
            return Err(HarnessError::HarnessFault(format!(
                "duplicate case '{}'",
                name
            )));
        }
        self.cases.push(CaseDef { name, body });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// 按声明顺序惰性产生新的用例句柄
    ///
    /// 每次调用都重新开始，句柄之间不共享状态。生成器本身不写入结果日志。
    pub fn iterate<'a>(
        &'a self,
        recorder: &'a SpecRecorder,
    ) -> impl Iterator<Item = CaseHandle> + 'a {
        self.cases
            .iter()
            .map(move |def| CaseHandle::new(def.name.clone(), def.body.clone(), recorder.clone()))
    }
}
