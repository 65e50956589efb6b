//! Per-attempt execution records kept for every utility run.

use serde::Serialize;

/// One invocation of an external program, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub name: String,
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionRecord {
    pub fn new(
        name: impl Into<String>,
        rc: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rc,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Ordered record of every attempt made during one operation.
///
/// Records are only ever appended. The single permitted mutation is
/// [`ExecutionLog::override_last_rc`], used when the utility reports a
/// non-zero code but its own completion markers say it ran to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionLog {
    records: Vec<ExecutionRecord>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    /// Rewrite the return code of the most recent record.
    pub fn override_last_rc(&mut self, rc: i32) {
        if let Some(last) = self.records.last_mut() {
            last.rc = rc;
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionRecord> {
        self.records.iter()
    }
}

impl std::ops::Index<usize> for ExecutionLog {
    type Output = ExecutionRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a ExecutionLog {
    type Item = &'a ExecutionRecord;
    type IntoIter = std::slice::Iter<'a, ExecutionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
