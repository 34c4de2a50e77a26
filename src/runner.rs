//! Report runner
//!
//! Discovers result files in a directory, parses each one into suites,
//! and writes the JUnit document.

use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::junit;
use crate::parser::{parse_line, ParsedLine, SummaryLine};
use crate::suite::{SuiteSet, TestCaseRecord};

/// Configuration for the reporter
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory containing result files (not searched recursively)
    pub dir: PathBuf,
    /// Where the JUnit XML is written
    pub output: PathBuf,
    /// Prefix for file references in human-readable listings
    pub root_path: Option<String>,
    /// Substring a file name must contain to count as a result file
    pub pattern: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./"),
            output: PathBuf::from("result.xml"),
            root_path: None,
            pattern: ".test".into(),
        }
    }
}

/// Summary line found in one result file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file: String,
    pub summary: SummaryLine,
}

/// Result of a reporting run
#[derive(Debug)]
pub struct RunReport {
    /// Parsed suites, one per result file
    pub suites: SuiteSet,
    /// Summary lines as printed by the test binaries
    pub summaries: Vec<FileSummary>,
    /// Result files that were read
    pub files: Vec<PathBuf>,
    /// Path the XML was written to
    pub output: PathBuf,
    /// Prefix for file references in listings
    pub root_path: Option<String>,
}

impl RunReport {
    /// Totals printed by the test binaries (informational)
    pub fn reported_totals(&self) -> SummaryLine {
        self.summaries.iter().fold(SummaryLine::default(), |acc, s| SummaryLine {
            tests: acc.tests + s.summary.tests,
            failures: acc.failures + s.summary.failures,
            ignored: acc.ignored + s.summary.ignored,
        })
    }

    /// `<root><file>:<line>:<name>:: <message>` for every failed case
    pub fn failure_listing(&self) -> Vec<String> {
        self.listing(TestCaseRecord::is_failure)
    }

    /// Same as [`failure_listing`](Self::failure_listing) for ignored cases
    pub fn ignore_listing(&self) -> Vec<String> {
        self.listing(TestCaseRecord::is_skipped)
    }

    fn listing(&self, pick: fn(&TestCaseRecord) -> bool) -> Vec<String> {
        let root = self.root_path.as_deref().unwrap_or("");
        self.suites
            .iter()
            .flat_map(|suite| suite.cases.iter())
            .filter(|case| pick(case))
            .map(|case| {
                format!(
                    "{}{}:{}:{}:: {}",
                    root,
                    case.file,
                    case.line,
                    case.name,
                    case.message().unwrap_or("").trim(),
                )
            })
            .collect()
    }

    /// Format a summary line
    pub fn summary(&self) -> String {
        format!(
            "{} tests, {} failures, {} ignored in {} suite(s) -> {}",
            self.suites.tests(),
            self.suites.failures(),
            self.suites.skipped(),
            self.suites.len(),
            self.output.display(),
        )
    }
}

/// Suite key for a result file: the path as given, with `/` separators
pub fn suite_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The reporter
pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Discover result files directly inside the configured directory
    pub fn discover(&self) -> Result<Vec<PathBuf>, ReportError> {
        let dir = &self.config.dir;
        let entries = std::fs::read_dir(dir).map_err(|e| ReportError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io(dir, e))?;
            let path = entry.path();
            if path.is_file() && self.is_result_file(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(ReportError::no_result_files(dir));
        }

        files.sort();
        tracing::debug!(dir = %dir.display(), count = files.len(), "discovered result files");
        Ok(files)
    }

    fn is_result_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |name| {
                // glob-style: hidden files never match
                !name.starts_with('.') && name.contains(self.config.pattern.as_str())
            })
    }

    /// Parse one result file, appending its cases to `suites`.
    ///
    /// Returns the summary lines found in the file. An empty file is an error.
    pub fn parse_file(
        &self,
        path: &Path,
        suites: &mut SuiteSet,
    ) -> Result<Vec<SummaryLine>, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        if content.is_empty() {
            return Err(ReportError::empty_result_file(path));
        }

        let key = suite_key(path);
        Ok(parse_content(&content, &key, suites))
    }

    /// Parse every file in order into a fresh suite set.
    pub fn collect(&self, files: &[PathBuf]) -> Result<(SuiteSet, Vec<FileSummary>), ReportError> {
        let mut suites = SuiteSet::new();
        let mut summaries = Vec::new();

        for file in files {
            let key = suite_key(file);
            let before = suites.get(&key).map_or(0, |s| s.tests());
            let found = self.parse_file(file, &mut suites)?;
            let parsed = suites.get(&key).map_or(0, |s| s.tests()) - before;

            for summary in found {
                if summary.tests as usize != parsed {
                    tracing::warn!(
                        file = %key,
                        reported = summary.tests,
                        parsed,
                        "summary line disagrees with parsed test cases"
                    );
                }
                summaries.push(FileSummary {
                    file: key.clone(),
                    summary,
                });
            }
            tracing::debug!(file = %key, cases = parsed, "parsed result file");
        }

        Ok((suites, summaries))
    }

    /// Discover, parse, and write the report
    pub fn run(&self) -> Result<RunReport, ReportError> {
        let files = self.discover()?;
        self.run_files(files)
    }

    /// Parse the given files and write the report
    pub fn run_files(&self, files: Vec<PathBuf>) -> Result<RunReport, ReportError> {
        if files.is_empty() {
            return Err(ReportError::no_result_files(&self.config.dir));
        }

        let (suites, summaries) = self.collect(&files)?;
        junit::write_report(&suites, &self.config.output)?;
        tracing::info!(
            output = %self.config.output.display(),
            suites = suites.len(),
            "wrote JUnit report"
        );

        Ok(RunReport {
            suites,
            summaries,
            files,
            output: self.config.output.clone(),
            root_path: self.config.root_path.clone(),
        })
    }
}

/// Classify every line of `content`, appending case records under `key`.
pub fn parse_content(content: &str, key: &str, suites: &mut SuiteSet) -> Vec<SummaryLine> {
    // Materialize the suite even if no line turns out to be a case
    suites.suite_mut(key);

    let mut summaries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        match parse_line(line) {
            ParsedLine::Case(case) => {
                suites.push(key, TestCaseRecord::from_line(&case, key));
            }
            ParsedLine::Summary(summary) => summaries.push(summary),
            ParsedLine::End(_) | ParsedLine::Blank | ParsedLine::Separator => {}
            ParsedLine::Unrecognized => {
                tracing::trace!(
                    file = key,
                    line = idx + 1,
                    text = line,
                    "skipping unrecognized line"
                );
            }
        }
    }
    summaries
}

/// Builder API for convenient reporter construction
pub struct ReporterBuilder {
    config: ReportConfig,
}

impl ReporterBuilder {
    /// Start building a reporter for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            config: ReportConfig {
                dir: dir.into(),
                ..Default::default()
            },
        }
    }

    /// Set the output file
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Set the root path used in listings
    pub fn root_path(mut self, root: impl Into<String>) -> Self {
        self.config.root_path = Some(root.into());
        self
    }

    pub fn build(self) -> Reporter {
        Reporter::new(self.config)
    }

    /// Build and run
    pub fn run(self) -> Result<RunReport, ReportError> {
        self.build().run()
    }
}

/// Convenience function: create a reporter builder for a directory
pub fn report(dir: impl Into<PathBuf>) -> ReporterBuilder {
    ReporterBuilder::new(dir)
}
