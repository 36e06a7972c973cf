use crate::error::{HarnessError, Result};
use crate::query::{GroupId, TestId};
use crate::results::export::{ExportView, to_json_string};
use crate::results::recorder::SpecRecorder;
use crate::runner::RunResult;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct LogState {
    scopes: BTreeSet<GroupId>,
    entries: BTreeMap<TestId, Vec<RunResult>>,
    sealed: bool,
}

/// Append-only store of run results, keyed by test identifier.
///
/// Cloning yields another handle to the same store. `append` takes a
/// mutex, so handles may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    state: Arc<Mutex<LogState>>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        // a panicking case body never holds this lock, so the state is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `scope` and return a recorder that appends under it.
    ///
    /// Registering a scope again hands out another recorder for the same
    /// scope; results keep accumulating in one sequence per case.
    pub fn record(&self, scope: &GroupId) -> Result<SpecRecorder> {
        if scope.path().is_empty() {
            return Err(HarnessError::HarnessFault(format!(
                "cannot record cases directly under suite '{}'",
                scope
            )));
        }

        let mut state = self.lock();
        if state.sealed {
            return Err(sealed_fault());
        }
        if !state.scopes.insert(scope.clone()) {
            debug!(scope = %scope, "Scope already registered");
        }

        Ok(SpecRecorder::new(scope.clone(), self.clone()))
    }

    /// Append `result` to the sequence for `id`. Never overwrites.
    pub fn append(&self, id: TestId, result: RunResult) -> Result<()> {
        let mut state = self.lock();
        if state.sealed {
            return Err(sealed_fault());
        }
        state.entries.entry(id).or_default().push(result);
        Ok(())
    }

    /// Finalize the session. Later `record`, `append` and case runs fail.
    pub fn seal(&self) {
        self.lock().sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_sealed() {
            Err(sealed_fault())
        } else {
            Ok(())
        }
    }

    pub fn is_registered(&self, scope: &GroupId) -> bool {
        self.lock().scopes.contains(scope)
    }

    /// All results appended for `id`, in append order.
    pub fn results(&self, id: &TestId) -> Vec<RunResult> {
        self.lock().entries.get(id).cloned().unwrap_or_default()
    }

    /// Identifiers with at least one result, in identifier order.
    pub fn ids(&self) -> Vec<TestId> {
        self.lock().entries.keys().cloned().collect()
    }

    /// Number of identifiers with at least one result.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Serialize the whole mapping. Keys are canonical identifier strings,
    /// sorted by identifier order; `indent == 0` gives compact output.
    pub fn export_json(&self, indent: usize) -> Result<String> {
        let state = self.lock();
        to_json_string(&ExportView(&state.entries), indent)
    }
}

fn sealed_fault() -> HarnessError {
    HarnessError::HarnessFault("result log is sealed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CaseName;
    use crate::runner::Status;
    use std::time::Duration;

    fn file(path: &[&str]) -> GroupId {
        GroupId::new("suite", path.iter().copied()).unwrap()
    }

    fn case_id(path: &[&str], name: &str) -> TestId {
        TestId::Case(file(path).join(&CaseName::new(name).unwrap()).unwrap())
    }

    fn result(status: Status, millis: u64) -> RunResult {
        RunResult::new(status, Duration::from_millis(millis), Vec::new())
    }

    #[test]
    fn test_export_empty() {
        let log = ResultLog::new();
        assert!(log.is_empty());
        assert_eq!(log.export_json(0).unwrap(), "{}");
        assert_eq!(log.export_json(2).unwrap(), "{}");
    }

    #[test]
    fn test_append_never_overwrites() {
        let log = ResultLog::new();
        let id = case_id(&["g", "f"], "a");

        log.append(id.clone(), result(Status::Fail, 1)).unwrap();
        log.append(id.clone(), result(Status::Pass, 2)).unwrap();

        let results = log.results(&id);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(results[1].status, Status::Pass);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_export_sorted_by_identifier() {
        let log = ResultLog::new();
        log.append(case_id(&["g", "f"], "b"), result(Status::Pass, 1))
            .unwrap();
        log.append(case_id(&["a"], "z"), result(Status::Pass, 1))
            .unwrap();
        log.append(case_id(&["g", "f"], "a"), result(Status::Pass, 1))
            .unwrap();

        let json = log.export_json(0).unwrap();
        let a = json.find("suite:a:z").unwrap();
        let b = json.find("suite:g/f:a").unwrap();
        let c = json.find("suite:g/f:b").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_export_indent() {
        let log = ResultLog::new();
        log.append(case_id(&["f"], "a"), result(Status::Pass, 1))
            .unwrap();

        let pretty = log.export_json(4).unwrap();
        assert!(pretty.contains("\n    \"suite:f:a\": ["));

        let compact = log.export_json(0).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_record_registers_scope_without_entries() {
        let log = ResultLog::new();
        let scope = file(&["g", "f"]);

        log.record(&scope).unwrap();
        log.record(&scope).unwrap();

        assert!(log.is_registered(&scope));
        assert!(log.is_empty());
    }

    #[test]
    fn test_record_rejects_suite_root() {
        let log = ResultLog::new();
        let root = GroupId::suite_root("suite").unwrap();
        assert!(matches!(
            log.record(&root),
            Err(HarnessError::HarnessFault(_))
        ));
    }

    #[test]
    fn test_sealed_log_rejects_writes() {
        let log = ResultLog::new();
        log.append(case_id(&["f"], "a"), result(Status::Pass, 1))
            .unwrap();
        log.seal();

        assert!(matches!(
            log.append(case_id(&["f"], "a"), result(Status::Pass, 1)),
            Err(HarnessError::HarnessFault(_))
        ));
        assert!(log.record(&file(&["f"])).is_err());
        // 封存后仍然可以导出
        assert_eq!(log.len(), 1);
        assert!(log.export_json(2).is_ok());
    }
}
