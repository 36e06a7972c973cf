use crate::Result;
use crate::generator::context::FAIL_PREFIX;
use crate::generator::{CaseBody, CaseContext};
use crate::query::{CaseId, CaseName};
use crate::results::SpecRecorder;
use crate::runner::types::{RunResult, Status};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, info, warn};

const PANIC_PREFIX: &str = "PANIC: ";

/// 单个可运行用例的句柄
///
/// 由 `CaseGenerator::iterate` 创建，不携带任何历史结果。
/// `run()` 可以多次调用，每次都是独立的执行，并向结果日志追加一条记录。
#[derive(Clone)]
pub struct CaseHandle {
    name: CaseName,
    body: CaseBody,
    recorder: SpecRecorder,
}

impl fmt::Debug for CaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseHandle")
            .field("name", &self.name)
            .field("scope", self.recorder.scope())
            .finish()
    }
}

impl CaseHandle {
    pub(crate) fn new(name: CaseName, body: CaseBody, recorder: SpecRecorder) -> Self {
        Self {
            name,
            body,
            recorder,
        }
    }

    /// 相对于所属规格的用例名
    pub fn name(&self) -> &CaseName {
        &self.name
    }

    /// 完整标识符
    pub fn id(&self) -> CaseId {
        self.recorder.case_id(&self.name)
    }

    /// 规范查询字符串，例如 `suite:group/file:case`
    pub fn query_string(&self) -> String {
        self.id().to_string()
    }

    /// 执行用例体一次
    ///
    /// 普通的测试失败（返回 Err、panic、`ctx.fail`）都体现在 `RunResult`
    /// 中；只有结果日志在开始前已封存、无法执行时才返回 `HarnessFault`。
    /// 用例体执行期间日志被封存时，结果照常返回但不写入日志。
    pub async fn run(&self) -> Result<RunResult> {
        self.recorder.ensure_open()?;

        let id = self.id();
        let ctx = CaseContext::new(self.name.clone());
        debug!(case = %id, "Running case");

        // 计时只覆盖用例体（包括其内部的挂起点）
        let start = Instant::now();
        let body = async { (self.body)(ctx.clone()).await };
        let outcome = AssertUnwindSafe(body).catch_unwind().await;
        let elapsed = start.elapsed();

        let output = ctx.take_output();
        let mut lines = output.lines;

        let status = match outcome {
            Err(payload) => {
                lines.push(format!("{}{}", PANIC_PREFIX, panic_message(payload.as_ref())));
                Status::Fail
            }
            Ok(Err(e)) => {
                lines.push(format!("{}{:#}", FAIL_PREFIX, e));
                Status::Fail
            }
            Ok(Ok(())) if output.failed => Status::Fail,
            Ok(Ok(())) if output.warned => Status::Warn,
            Ok(Ok(())) => Status::Pass,
        };

        let result = RunResult::new(status, elapsed, lines);
        if let Err(e) = self.recorder.append(&self.name, result.clone()) {
            warn!(case = %id, error = %e, "Result not recorded");
        }

        match status {
            Status::Fail => warn!(
                case = %id,
                elapsed_ms = result.elapsed_millis,
                "Case failed"
            ),
            _ => info!(
                case = %id,
                status = %status,
                elapsed_ms = result.elapsed_millis,
                "Case finished"
            ),
        }

        Ok(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
