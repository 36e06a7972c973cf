use crate::error::{HarnessError, Result};
use crate::loader::source::SpecSource;
use crate::loader::types::LoadEntry;
use crate::query::{GroupId, Query, TestId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 把查询解析为按清单顺序排列的加载条目
#[derive(Clone)]
pub struct SpecLoader {
    source: Arc<dyn SpecSource>,
}

impl SpecLoader {
    pub fn new(source: Arc<dyn SpecSource>) -> Self {
        Self { source }
    }

    /// 解析查询字符串并展开为加载条目
    pub async fn load_from(&self, query: &str) -> Result<Vec<LoadEntry>> {
        let query = Query::parse(query)?;
        self.load_query(&query).await
    }

    /// 展开已解析的查询
    ///
    /// 每个匹配的文件只产生一个条目，顺序与清单一致；规格本身此时尚未加载。
    pub async fn load_query(&self, query: &Query) -> Result<Vec<LoadEntry>> {
        let mut manifests: HashMap<String, Vec<GroupId>> = HashMap::new();
        let mut entries: Vec<LoadEntry> = Vec::new();
        let mut positions: HashMap<GroupId, usize> = HashMap::new();

        for id in &query.ids {
            let suite = id.group().suite();
            if !manifests.contains_key(suite) {
                let manifest = self.source.manifest(suite).await?;
                debug!(suite, files = manifest.len(), "Loaded manifest");
                manifests.insert(suite.to_string(), manifest);
            }

            for file in &manifests[suite] {
                if !matches_file(id, file) {
                    continue;
                }

                let filter = id.case().cloned();
                match positions.get(file) {
                    Some(&index) => entries[index].widen(filter),
                    None => {
                        positions.insert(file.clone(), entries.len());
                        entries.push(LoadEntry::new(
                            file.clone(),
                            filter.into_iter().collect(),
                            self.source.clone(),
                        ));
                    }
                }
            }
        }

        if entries.is_empty() {
            return Err(HarnessError::NoMatchingTests(query.to_query_string()));
        }

        // 多个查询可能交错，恢复清单顺序
        sort_by_manifest(&mut entries, &manifests);

        info!(entries = entries.len(), "Resolved query");
        Ok(entries)
    }
}

/// 分组查询匹配其下的所有文件；用例查询只匹配所在文件
fn matches_file(id: &TestId, file: &GroupId) -> bool {
    match id {
        TestId::Group(group) => group.contains(file),
        TestId::Case(case) => case.group() == file,
    }
}

fn sort_by_manifest(entries: &mut [LoadEntry], manifests: &HashMap<String, Vec<GroupId>>) {
    let mut suite_order: Vec<&str> = Vec::new();
    for entry in entries.iter() {
        let suite = entry.id().suite();
        if !suite_order.contains(&suite) {
            suite_order.push(suite);
        }
    }

    let key = |entry: &LoadEntry| {
        let suite = entry.id().suite();
        let suite_index = suite_order.iter().position(|s| *s == suite).unwrap_or(0);
        let file_index = manifests
            .get(suite)
            .and_then(|files| files.iter().position(|f| f == entry.id()))
            .unwrap_or(usize::MAX);
        (suite_index, file_index)
    };

    let mut keyed: Vec<((usize, usize), LoadEntry)> =
        entries.iter().map(|e| (key(e), e.clone())).collect();
    keyed.sort_by_key(|(k, _)| *k);

    for (slot, (_, entry)) in entries.iter_mut().zip(keyed) {
        *slot = entry;
    }
}
