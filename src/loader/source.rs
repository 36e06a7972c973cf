use crate::error::{HarnessError, Result};
use crate::loader::types::Specification;
use crate::query::GroupId;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Where specifications come from.
///
/// `manifest` lists the file-level identifiers of a suite in manifest
/// order; `load` fetches one of them. Fetching is only started when the
/// returned future is awaited.
#[async_trait]
pub trait SpecSource: Send + Sync {
    async fn manifest(&self, suite: &str) -> Result<Vec<GroupId>>;

    async fn load(&self, id: &GroupId) -> anyhow::Result<Specification>;
}

type SpecFactory = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<Specification>> + Send + Sync>;

/// In-process registry of suites and their files.
#[derive(Default)]
pub struct MemorySource {
    suites: HashMap<String, Vec<(GroupId, SpecFactory)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built specification.
    pub fn insert(&mut self, id: GroupId, spec: Specification) -> Result<()> {
        self.insert_with(id, move || {
            let spec = spec.clone();
            async move { Ok(spec) }
        })
    }

    /// Register a deferred specification; `factory` runs on every load.
    pub fn insert_with<F, Fut>(&mut self, id: GroupId, factory: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Specification>> + Send + 'static,
    {
        if id.path().is_empty() {
            return Err(HarnessError::HarnessFault(format!(
                "file entry for suite '{}' needs a path",
                id
            )));
        }

        let files = self.suites.entry(id.suite().to_string()).or_default();
        if files.iter().any(|(existing, _)| existing == &id) {
            return Err(HarnessError::HarnessFault(format!(
                "duplicate manifest entry '{}'",
                id
            )));
        }

        let factory: SpecFactory = Arc::new(move || factory().boxed());
        files.push((id, factory));
        Ok(())
    }

    pub fn with(mut self, id: GroupId, spec: Specification) -> Result<Self> {
        self.insert(id, spec)?;
        Ok(self)
    }
}

#[async_trait]
impl SpecSource for MemorySource {
    async fn manifest(&self, suite: &str) -> Result<Vec<GroupId>> {
        self.suites
            .get(suite)
            .map(|files| files.iter().map(|(id, _)| id.clone()).collect())
            .ok_or_else(|| HarnessError::NoMatchingTests(format!("unknown suite '{}'", suite)))
    }

    async fn load(&self, id: &GroupId) -> anyhow::Result<Specification> {
        let factory = self
            .suites
            .get(id.suite())
            .and_then(|files| files.iter().find(|(existing, _)| existing == id))
            .map(|(_, factory)| factory.clone())
            .ok_or_else(|| anyhow::anyhow!("'{}' is not in the manifest", id))?;

        factory().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &[&str]) -> GroupId {
        GroupId::new("suite", path.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_manifest_keeps_insertion_order() {
        let source = MemorySource::new()
            .with(file(&["b"]), Specification::group("b"))
            .unwrap()
            .with(file(&["a"]), Specification::group("a"))
            .unwrap();

        let manifest = source.manifest("suite").await.unwrap();
        assert_eq!(manifest, vec![file(&["b"]), file(&["a"])]);
    }

    #[tokio::test]
    async fn test_unknown_suite() {
        let source = MemorySource::new();
        let result = source.manifest("missing").await;
        assert!(matches!(result, Err(HarnessError::NoMatchingTests(_))));
    }

    #[test]
    fn test_rejects_duplicates_and_root() {
        let mut source = MemorySource::new();
        source.insert(file(&["a"]), Specification::group("a")).unwrap();
        assert!(source.insert(file(&["a"]), Specification::group("a")).is_err());

        let root = GroupId::suite_root("suite").unwrap();
        assert!(source.insert(root, Specification::group("root")).is_err());
    }

    #[tokio::test]
    async fn test_load_failure() {
        let mut source = MemorySource::new();
        source
            .insert_with(file(&["broken"]), || async {
                Err(anyhow::anyhow!("syntax error"))
            })
            .unwrap();

        let err = source.load(&file(&["broken"])).await.unwrap_err();
        assert_eq!(err.to_string(), "syntax error");
    }
}
