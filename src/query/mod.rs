/// 查询模块 - 测试标识符与查询字符串
pub mod parser;
pub mod types;
pub mod url_query;

pub use parser::{parse_case_name, parse_test_id};
pub use types::{CaseId, CaseName, GroupId, TestId};
pub use url_query::Query;
