use crate::error::{HarnessError, Result};
use crate::query::types::TestId;
use tracing::debug;
use url::form_urlencoded;

const QUERY_KEY: &str = "q";
const RUN_NOW_KEY: &str = "runnow";

/// URL 查询字符串：一个或多个标识符以及执行标志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub ids: Vec<TestId>,
    pub run_now: bool,
}

impl Query {
    pub fn new(id: TestId) -> Self {
        Self {
            ids: vec![id],
            run_now: false,
        }
    }

    pub fn with_run_now(mut self, run_now: bool) -> Self {
        self.run_now = run_now;
        self
    }

    /// 解析查询字符串
    ///
    /// 以 `?` 开头时按 URL 查询解析（`?q=...&q=...&runnow=1`），
    /// 未识别的键会被忽略；否则整个字符串作为单个标识符解析。
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let Some(search) = input.strip_prefix('?') else {
            return Ok(Self::new(input.parse()?));
        };

        let mut ids: Vec<TestId> = Vec::new();
        let mut run_now = false;

        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            match &*key {
                QUERY_KEY => ids.push(value.parse()?),
                RUN_NOW_KEY => run_now = value == "1",
                other => debug!(key = other, "Ignoring unrecognized query key"),
            }
        }

        if ids.is_empty() {
            return Err(HarnessError::MalformedQuery(format!(
                "no '{}' parameter in '{}'",
                QUERY_KEY, input
            )));
        }

        Ok(Self { ids, run_now })
    }

    /// 规范形式，`Query::parse` 可以完整还原
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for id in &self.ids {
            serializer.append_pair(QUERY_KEY, &id.to_string());
        }
        if self.run_now {
            serializer.append_pair(RUN_NOW_KEY, "1");
        }
        format!("?{}", serializer.finish())
    }
}
