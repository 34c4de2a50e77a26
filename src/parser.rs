//! Result log line parser
//!
//! Classifies lines of a captured Unity test run:
//! - `[file:]line:name:STATUS[:message]` is a case line (`PASS`, `FAIL`, `IGNORE`)
//! - `N Tests N Failures N Ignored` is the summary line
//! - `OK` / `FAIL` alone is the end marker
//! - blank lines and runs of `-` are recognized and carry nothing
//! - anything else is unrecognized and dropped by the caller
//!
//! A file reference may begin with a drive letter (`C:/src/test.c`); that
//! first colon is part of the path, not a field delimiter.

use std::sync::OnceLock;

use regex::Regex;

/// Outcome reported on a case line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Fail,
    Ignore,
}

impl Status {
    /// Match a status token exactly as Unity prints it.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "IGNORE" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// A parsed case line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    /// Source file reference, if the line carried one
    pub file: Option<String>,
    /// Line number as printed
    pub line: String,
    /// Test case name
    pub name: String,
    pub status: Status,
    /// Free text after the status, if any
    pub message: Option<String>,
}

/// The `N Tests N Failures N Ignored` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryLine {
    pub tests: u32,
    pub failures: u32,
    pub ignored: u32,
}

/// Final verdict line printed by the test binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMarker {
    Ok,
    Fail,
}

/// Classification of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Case(ResultLine),
    Summary(SummaryLine),
    End(EndMarker),
    Blank,
    Separator,
    Unrecognized,
}

fn summary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s+Tests\s+(\d+)\s+Failures\s+(\d+)\s+Ignored")
            .expect("summary pattern is valid")
    })
}

/// Parse a single line of a result file.
///
/// Alternatives are tried in order: case line, summary line, end marker,
/// blank, separator. Never fails; lines matching nothing come back as
/// [`ParsedLine::Unrecognized`].
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim_end();

    if let Some(case) = parse_case_line(line) {
        return ParsedLine::Case(case);
    }
    if let Some(summary) = parse_summary_line(line) {
        return ParsedLine::Summary(summary);
    }

    let trimmed = line.trim();
    match trimmed {
        "OK" | "Ok" => ParsedLine::End(EndMarker::Ok),
        "FAIL" => ParsedLine::End(EndMarker::Fail),
        "" => ParsedLine::Blank,
        _ if trimmed.chars().all(|c| c == '-') => ParsedLine::Separator,
        _ => ParsedLine::Unrecognized,
    }
}

/// Parse `[file:]line:name:STATUS[:message]`.
pub fn parse_case_line(line: &str) -> Option<ResultLine> {
    let line = line.trim();

    // C:/path/test.c:12:... keeps the drive colon inside the file field
    if let Some(prefix_len) = drive_prefix_len(line) {
        let colon = line[prefix_len..].find(':')? + prefix_len;
        let file = &line[..colon];
        let fields: Vec<&str> = line[colon + 1..].splitn(4, ':').collect();
        return build_case(Some(file), &fields);
    }

    // line:name:STATUS[:message], no file reference at all
    let fields: Vec<&str> = line.splitn(4, ':').collect();
    if fields.len() >= 3
        && is_line_number(fields[0].trim())
        && Status::from_token(fields[2].trim()).is_some()
    {
        return build_case(None, &fields);
    }

    let fields: Vec<&str> = line.splitn(5, ':').collect();
    if fields.len() < 4 {
        return None;
    }
    build_case(Some(fields[0]), &fields[1..])
}

/// Parse `N Tests N Failures N Ignored`.
pub fn parse_summary_line(line: &str) -> Option<SummaryLine> {
    let caps = summary_regex().captures(line)?;
    Some(SummaryLine {
        tests: caps[1].parse().ok()?,
        failures: caps[2].parse().ok()?,
        ignored: caps[3].parse().ok()?,
    })
}

/// `fields` is `[line, name, status]` or `[line, name, status, message]`.
fn build_case(file: Option<&str>, fields: &[&str]) -> Option<ResultLine> {
    if fields.len() < 3 {
        return None;
    }
    let line = fields[0].trim();
    let name = fields[1].trim();
    let status = Status::from_token(fields[2].trim())?;
    if !is_line_number(line) || name.is_empty() {
        return None;
    }

    let file = file.map(str::trim).filter(|f| !f.is_empty());
    let message = fields
        .get(3)
        .map(|m| m.trim())
        .filter(|m| !m.is_empty());

    Some(ResultLine {
        file: file.map(str::to_string),
        line: line.to_string(),
        name: name.to_string(),
        status,
        message: message.map(str::to_string),
    })
}

fn is_line_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Length of a leading `X:/` or `X:\` drive prefix, if present.
fn drive_prefix_len(line: &str) -> Option<usize> {
    let b = line.as_bytes();
    if b.len() >= 3
        && b[0].is_ascii_alphabetic()
        && b[1] == b':'
        && (b[2] == b'/' || b[2] == b'\\')
    {
        Some(3)
    } else {
        None
    }
}
