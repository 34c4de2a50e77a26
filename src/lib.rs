//! unity-junit: convert Unity test result logs into JUnit XML
//!
//! # Overview
//!
//! A Unity test binary prints one line per test case followed by a summary.
//! CI captures that output into `*.testpass` / `*.testfail` files; this crate
//! reads them and emits one JUnit `<testsuite>` per result file.
//!
//! # Result file format
//!
//! ```text
//! test/test_foo.c:10:test_should_pass:PASS
//! test/test_foo.c:15:test_should_fail:FAIL:expected 1 but was 2
//! test/test_foo.c:20:test_should_skip:IGNORE:not implemented
//!
//! -----------------------
//! 3 Tests 1 Failures 1 Ignored
//! FAIL
//! ```
//!
//! | Line | Meaning |
//! |------|---------|
//! | `[file:]line:name:STATUS[:msg]` | One test case (`PASS`, `FAIL`, `IGNORE`) |
//! | `N Tests N Failures N Ignored` | Summary (informational) |
//! | `OK` / `FAIL` | End marker |
//! | blank, `-----` | Ignored |
//!
//! Any other line is skipped.
//!
//! # Usage
//!
//! ```rust,no_run
//! let report = unity_junit::report("build/test/results")
//!     .output("build/junit.xml")
//!     .run()?;
//! println!("{}", report.summary());
//! # Ok::<(), unity_junit::ReportError>(())
//! ```

mod error;
mod junit;
mod parser;
mod runner;
mod suite;

pub use error::{ErrorKind, ReportError};
pub use junit::{to_xml, write_report};
pub use parser::{
    parse_case_line, parse_line, parse_summary_line, EndMarker, ParsedLine, ResultLine, Status,
    SummaryLine,
};
pub use runner::{
    parse_content, report, suite_key, FileSummary, ReportConfig, Reporter, ReporterBuilder,
    RunReport,
};
pub use suite::{
    classname_from_result_file, classname_from_source, CaseStatus, Suite, SuiteSet,
    TestCaseRecord, BLANK_MESSAGE,
};
