use crate::error::{HarnessError, Result};
use std::cmp::Ordering;
use std::fmt;

/// 标识符组件中不允许出现的字符
pub(crate) const RESERVED: &[char] = &[':', '/', ';', '=', '?', '&', '#'];

/// 校验单个组件（suite、路径段、用例名、参数键值）
pub(crate) fn validate_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(HarnessError::MalformedQuery(format!("empty {}", kind)));
    }
    if let Some(c) = value
        .chars()
        .find(|c| RESERVED.contains(c) || c.is_whitespace())
    {
        return Err(HarnessError::MalformedQuery(format!(
            "{} '{}' contains reserved character {:?}",
            kind, value, c
        )));
    }
    Ok(())
}

/// 一个 suite 内的分组（suite 本身、目录或文件）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    suite: String,
    path: Vec<String>,
}

impl GroupId {
    pub fn new<I, S>(suite: impl Into<String>, path: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suite = suite.into();
        validate_component("suite", &suite)?;

        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        for segment in &path {
            validate_component("path segment", segment)?;
        }

        Ok(Self { suite, path })
    }

    /// 整个 suite
    pub fn suite_root(suite: impl Into<String>) -> Result<Self> {
        Self::new(suite, Vec::<String>::new())
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// 与相对用例名组合为完整的用例标识符
    pub fn join(&self, case: &CaseName) -> Result<CaseId> {
        CaseId::new(self.clone(), case.clone())
    }

    /// `self` 是否覆盖 `other`：同一 suite，且路径逐段是前缀
    pub fn contains(&self, other: &GroupId) -> bool {
        self.suite == other.suite && other.path.starts_with(&self.path)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.suite)
        } else {
            write!(f, "{}:{}", self.suite, self.path.join("/"))
        }
    }
}

/// 相对用例名：名称加上按声明顺序排列的参数，参数属于用例身份的一部分
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseName {
    name: String,
    params: Vec<(String, String)>,
}

impl CaseName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_component("case name", &name)?;
        Ok(Self {
            name,
            params: Vec::new(),
        })
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        validate_component("parameter key", &key)?;
        validate_component("parameter value", &value)?;
        self.params.push((key, value));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// 查询中的用例名是否选中 `other`：无参数时按名称匹配所有参数组合
    pub fn selects(&self, other: &CaseName) -> bool {
        if self.params.is_empty() {
            self.name == other.name
        } else {
            self == other
        }
    }
}

impl fmt::Display for CaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.params {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

/// 单个用例的完整标识符，路径必须非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId {
    group: GroupId,
    case: CaseName,
}

impl CaseId {
    pub fn new(group: GroupId, case: CaseName) -> Result<Self> {
        if group.path.is_empty() {
            return Err(HarnessError::MalformedQuery(format!(
                "case '{}' requires a path within suite '{}'",
                case, group.suite
            )));
        }
        Ok(Self { group, case })
    }

    /// 调用方保证 `group` 路径非空
    pub(crate) fn from_scope(group: GroupId, case: CaseName) -> Self {
        debug_assert!(!group.path.is_empty());
        Self { group, case }
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn case(&self) -> &CaseName {
        &self.case
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.case)
    }
}

/// 测试标识符：分组或单个用例
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestId {
    Group(GroupId),
    Case(CaseId),
}

impl TestId {
    pub fn group(&self) -> &GroupId {
        match self {
            TestId::Group(group) => group,
            TestId::Case(case) => &case.group,
        }
    }

    pub fn case(&self) -> Option<&CaseName> {
        match self {
            TestId::Group(_) => None,
            TestId::Case(case) => Some(&case.case),
        }
    }

    /// 同一 suite 且 `self` 的路径逐段是 `other` 路径的前缀。
    ///
    /// 只比较 suite 和路径，用例部分不参与比较。
    pub fn is_prefix_of(&self, other: &TestId) -> bool {
        self.group().contains(other.group())
    }
}

impl Ord for TestId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group()
            .cmp(other.group())
            .then_with(|| self.case().cmp(&other.case()))
    }
}

impl PartialOrd for TestId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestId::Group(group) => fmt::Display::fmt(group, f),
            TestId::Case(case) => fmt::Display::fmt(case, f),
        }
    }
}

impl From<GroupId> for TestId {
    fn from(group: GroupId) -> Self {
        TestId::Group(group)
    }
}

impl From<CaseId> for TestId {
    fn from(case: CaseId) -> Self {
        TestId::Case(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(suite: &str, path: &[&str]) -> GroupId {
        GroupId::new(suite, path.iter().copied()).unwrap()
    }

    #[test]
    fn test_group_display() {
        assert_eq!(group("cts", &[]).to_string(), "cts");
        assert_eq!(group("cts", &["api", "buffer"]).to_string(), "cts:api/buffer");
    }

    #[test]
    fn test_case_requires_path() {
        let case = CaseName::new("a").unwrap();
        let result = CaseId::new(group("cts", &[]), case);
        assert!(matches!(result, Err(HarnessError::MalformedQuery(_))));
    }

    #[test]
    fn test_reserved_characters_rejected() {
        assert!(GroupId::new("c:ts", Vec::<String>::new()).is_err());
        assert!(GroupId::new("cts", ["a/b"]).is_err());
        assert!(CaseName::new("has space").is_err());
        assert!(CaseName::new("a").unwrap().with_param("k", "v=1").is_err());
        assert!(CaseName::new("").is_err());
    }

    #[test]
    fn test_absent_case_sorts_first() {
        let file = group("cts", &["api", "buffer"]);
        let group_id = TestId::Group(file.clone());
        let case_id = TestId::Case(file.join(&CaseName::new("a").unwrap()).unwrap());
        assert!(group_id < case_id);
    }

    #[test]
    fn test_ordering_is_component_wise() {
        let a = TestId::Group(group("cts", &["a", "z"]));
        let b = TestId::Group(group("cts", &["a-b"]));
        // "a" < "a-b" 逐段比较，而不是比较拼接后的字符串
        assert!(a < b);
    }

    #[test]
    fn test_params_are_part_of_identity() {
        let file = group("cts", &["f"]);
        let x1 = CaseName::new("c").unwrap().with_param("x", "1").unwrap();
        let x2 = CaseName::new("c").unwrap().with_param("x", "2").unwrap();
        assert_ne!(file.join(&x1).unwrap(), file.join(&x2).unwrap());
        assert_eq!(x1.to_string(), "c;x=1");
    }

    #[test]
    fn test_is_prefix_of() {
        let suite = TestId::Group(group("cts", &[]));
        let dir = TestId::Group(group("cts", &["api"]));
        let file = TestId::Group(group("cts", &["api", "buffer"]));
        let other = TestId::Group(group("other", &["api", "buffer"]));
        let sibling = TestId::Group(group("cts", &["apis"]));

        assert!(suite.is_prefix_of(&file));
        assert!(dir.is_prefix_of(&file));
        assert!(file.is_prefix_of(&file));
        assert!(!file.is_prefix_of(&dir));
        assert!(!dir.is_prefix_of(&other));
        assert!(!dir.is_prefix_of(&sibling));
    }

    #[test]
    fn test_case_id_is_prefix_by_path() {
        let case: TestId = "s:g:a".parse().unwrap();

        assert!(case.is_prefix_of(&"s:g/f".parse().unwrap()));
        assert!(case.is_prefix_of(&"s:g:b".parse().unwrap()));
        assert!(case.is_prefix_of(&case));
        assert!(!case.is_prefix_of(&"s:h:a".parse().unwrap()));
        assert!(!case.is_prefix_of(&"t:g:a".parse().unwrap()));
        assert!(!case.is_prefix_of(&"s".parse().unwrap()));
    }

    #[test]
    fn test_case_name_selects() {
        let plain = CaseName::new("c").unwrap();
        let param = CaseName::new("c").unwrap().with_param("x", "1").unwrap();
        let other = CaseName::new("d").unwrap();

        assert!(plain.selects(&param));
        assert!(param.selects(&param));
        assert!(!param.selects(&plain));
        assert!(!plain.selects(&other));
    }
}
