use crate::error::{HarnessError, Result};
use crate::query::TestId;
use crate::runner::RunResult;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;

/// 以规范查询字符串为键、按标识符顺序输出的视图
pub(crate) struct ExportView<'a>(pub &'a BTreeMap<TestId, Vec<RunResult>>);

impl Serialize for ExportView<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, results) in self.0 {
            map.serialize_entry(&id.to_string(), results)?;
        }
        map.end()
    }
}

/// indent 为 0 时输出紧凑格式，否则使用 indent 个空格缩进
pub(crate) fn to_json_string<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let indent_bytes = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent_bytes));
    value.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| HarnessError::Other(e.to_string()))
}
