//! Test case records grouped into suites
//!
//! One [`Suite`] per result file. [`SuiteSet`] keeps suites in first-seen
//! order so the report is stable across runs.

use std::collections::HashMap;

use crate::parser::{ResultLine, Status};

/// Placeholder message for FAIL/IGNORE lines that carry no text
pub const BLANK_MESSAGE: &str = " ";

/// JUnit payload of a test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Skipped { message: String, output: String },
    Failed { message: String, output: String },
}

/// A JUnit-shaped test case built from one case line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseRecord {
    pub name: String,
    pub classname: String,
    /// Source file the case was reported from (result file if none was printed)
    pub file: String,
    /// Line number as printed
    pub line: String,
    pub status: CaseStatus,
}

impl TestCaseRecord {
    /// Build a record from a parsed case line found in `result_file`.
    pub fn from_line(line: &ResultLine, result_file: &str) -> Self {
        let classname = match line.file {
            Some(ref file) => classname_from_source(file),
            None => classname_from_result_file(result_file),
        };

        let status = match line.status {
            Status::Pass => CaseStatus::Passed,
            Status::Ignore => CaseStatus::Skipped {
                message: message_or_blank(line),
                output: location(line, result_file),
            },
            Status::Fail => CaseStatus::Failed {
                message: message_or_blank(line),
                output: location(line, result_file),
            },
        };

        Self {
            name: line.name.clone(),
            classname,
            file: line.file.clone().unwrap_or_else(|| result_file.to_string()),
            line: line.line.clone(),
            status,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, CaseStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, CaseStatus::Skipped { .. })
    }

    /// Message attached to a failure or skip
    pub fn message(&self) -> Option<&str> {
        match self.status {
            CaseStatus::Passed => None,
            CaseStatus::Skipped { ref message, .. } | CaseStatus::Failed { ref message, .. } => {
                Some(message.as_str())
            }
        }
    }
}

fn message_or_blank(line: &ResultLine) -> String {
    line.message
        .clone()
        .unwrap_or_else(|| BLANK_MESSAGE.to_string())
}

/// `[File]=<file>, [Line]=<line>`
fn location(line: &ResultLine, result_file: &str) -> String {
    let file = line.file.as_deref().unwrap_or(result_file);
    format!("[File]={}, [Line]={}", file, line.line)
}

/// `C:\work\test\test_foo.c` -> `test_foo`
pub fn classname_from_source(file: &str) -> String {
    let base = file.rsplit(is_separator).next().unwrap_or(file);
    strip_extension(base).to_string()
}

/// `./build/test_foo.testpass` -> `build/test_foo`
pub fn classname_from_result_file(result_file: &str) -> String {
    let trimmed = result_file.strip_prefix("./").unwrap_or(result_file);
    let base_start = trimmed.rfind(is_separator).map_or(0, |i| i + 1);
    let stem = strip_extension(&trimmed[base_start..]);
    format!("{}{}", &trimmed[..base_start], stem)
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

/// A named, ordered group of test cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub name: String,
    pub cases: Vec<TestCaseRecord>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn tests(&self) -> usize {
        self.cases.len()
    }

    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| c.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.cases.iter().filter(|c| c.is_skipped()).count()
    }
}

/// Suites keyed by result file, in first-seen order
#[derive(Debug, Default)]
pub struct SuiteSet {
    suites: Vec<Suite>,
    /// Index for O(1) lookup by key → position in `suites`
    index: HashMap<String, usize>,
}

impl SuiteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the suite for `key`, creating it on first use.
    pub fn suite_mut(&mut self, key: &str) -> &mut Suite {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.suites.push(Suite::new(key));
                self.index.insert(key.to_string(), self.suites.len() - 1);
                self.suites.len() - 1
            }
        };
        &mut self.suites[pos]
    }

    /// Append a record to the suite for `key`.
    pub fn push(&mut self, key: &str, record: TestCaseRecord) {
        self.suite_mut(key).cases.push(record);
    }

    pub fn get(&self, key: &str) -> Option<&Suite> {
        self.index.get(key).map(|&pos| &self.suites[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suite> {
        self.suites.iter()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn tests(&self) -> usize {
        self.suites.iter().map(Suite::tests).sum()
    }

    pub fn failures(&self) -> usize {
        self.suites.iter().map(Suite::failures).sum()
    }

    pub fn skipped(&self) -> usize {
        self.suites.iter().map(Suite::skipped).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_case_line;

    fn record(line: &str, result_file: &str) -> TestCaseRecord {
        let parsed = parse_case_line(line).unwrap();
        TestCaseRecord::from_line(&parsed, result_file)
    }

    #[test]
    fn test_pass_record() {
        let r = record("test/test_foo.c:10:test_ok:PASS", "test_foo.testpass");
        assert_eq!(r.name, "test_ok");
        assert_eq!(r.classname, "test_foo");
        assert_eq!(r.status, CaseStatus::Passed);
    }

    #[test]
    fn test_fail_record_location() {
        let r = record("test/test_foo.c:15:test_bad:FAIL:expected 1 but was 2", "x.testfail");
        assert_eq!(
            r.status,
            CaseStatus::Failed {
                message: "expected 1 but was 2".into(),
                output: "[File]=test/test_foo.c, [Line]=15".into(),
            }
        );
    }

    #[test]
    fn test_ignore_without_message_uses_blank() {
        let r = record("test_foo.c:20:test_later:IGNORE", "x.testpass");
        assert_eq!(
            r.status,
            CaseStatus::Skipped {
                message: " ".into(),
                output: "[File]=test_foo.c, [Line]=20".into(),
            }
        );
    }

    #[test]
    fn test_classname_fallback_to_result_file() {
        let r = record("10:test_ok:PASS", "./test_foo.testpass");
        assert_eq!(r.classname, "test_foo");

        let r = record("11:test_bad:FAIL:nope", "./build/test_bar.testfail");
        assert_eq!(r.classname, "build/test_bar");
        match r.status {
            CaseStatus::Failed { output, .. } => {
                assert_eq!(output, "[File]=./build/test_bar.testfail, [Line]=11");
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_classname_from_windows_path() {
        assert_eq!(classname_from_source(r"C:\work\test\test_win.c"), "test_win");
        assert_eq!(classname_from_source("C:/work/test/test_win.c"), "test_win");
        assert_eq!(classname_from_source("Makefile"), "Makefile");
        assert_eq!(classname_from_source("test.tar.c"), "test.tar");
    }

    #[test]
    fn test_suite_set_order_and_merge() {
        let mut set = SuiteSet::new();
        set.push("b.testpass", record("b.c:1:t1:PASS", "b.testpass"));
        set.push("a.testfail", record("a.c:1:t2:FAIL:x", "a.testfail"));
        set.push("b.testpass", record("b.c:2:t3:IGNORE", "b.testpass"));

        let names: Vec<&str> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b.testpass", "a.testfail"]);

        let b = set.get("b.testpass").unwrap();
        let cases: Vec<&str> = b.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cases, vec!["t1", "t3"]);
        assert_eq!(b.skipped(), 1);
        assert_eq!(set.tests(), 3);
        assert_eq!(set.failures(), 1);
        assert_eq!(set.skipped(), 1);
    }
}
