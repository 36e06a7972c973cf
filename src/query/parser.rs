use crate::error::{HarnessError, Result};
use crate::query::types::{CaseId, CaseName, GroupId, TestId};
use std::str::FromStr;

/// 解析规范形式的标识符：
/// - `suite`
/// - `suite:seg/seg`
/// - `suite:seg/seg:case;key=value`
pub fn parse_test_id(input: &str) -> Result<TestId> {
    let parts: Vec<&str> = input.split(':').collect();

    match parts.as_slice() {
        [suite] => Ok(TestId::Group(GroupId::suite_root(*suite)?)),
        [suite, path] => Ok(TestId::Group(parse_group(suite, path)?)),
        [suite, path, case] => {
            let group = parse_group(suite, path)?;
            let case = parse_case_name(case)?;
            Ok(TestId::Case(CaseId::new(group, case)?))
        }
        _ => Err(HarnessError::MalformedQuery(format!(
            "too many ':' separators in '{}'",
            input
        ))),
    }
}

fn parse_group(suite: &str, path: &str) -> Result<GroupId> {
    GroupId::new(suite, path.split('/'))
}

/// 解析 `name;key=value;key=value`
pub fn parse_case_name(input: &str) -> Result<CaseName> {
    let mut pieces = input.split(';');
    // split 至少产生一个元素
    let mut case = CaseName::new(pieces.next().unwrap_or_default())?;

    for piece in pieces {
        let (key, value) = piece.split_once('=').ok_or_else(|| {
            HarnessError::MalformedQuery(format!(
                "parameter '{}' is not of the form key=value",
                piece
            ))
        })?;
        case = case.with_param(key, value)?;
    }

    Ok(case)
}

impl FromStr for TestId {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        parse_test_id(s)
    }
}

impl FromStr for CaseName {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        parse_case_name(s)
    }
}
