//! JUnit XML serialization
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <testsuites tests="3" failures="1" errors="0" skipped="1">
//!     <testsuite name="test_foo.testfail" tests="3" failures="1" errors="0" skipped="1">
//!         <testcase name="test_should_pass" classname="test_foo"/>
//!         <testcase name="test_should_fail" classname="test_foo">
//!             <failure message="expected 1 but was 2" output="[File]=test_foo.c, [Line]=15"/>
//!         </testcase>
//!         ...
//! ```

use std::borrow::Cow;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::ReportError;
use crate::suite::{CaseStatus, Suite, SuiteSet, TestCaseRecord};

const INDENT: usize = 4;

/// Render all suites as a pretty-printed, UTF-8 JUnit document.
pub fn to_xml(suites: &SuiteSet) -> Result<String, ReportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("testsuites");
    push_counts(&mut root, suites.tests(), suites.failures(), suites.skipped());
    emit(&mut writer, Event::Start(root))?;

    for suite in suites.iter() {
        write_suite(&mut writer, suite)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("testsuites")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(ReportError::xml)?;
    xml.push('\n');
    Ok(xml)
}

/// Render and write the report to `path`.
pub fn write_report(suites: &SuiteSet, path: &Path) -> Result<(), ReportError> {
    let xml = to_xml(suites)?;
    std::fs::write(path, xml).map_err(|e| ReportError::io(path, e))
}

fn write_suite(writer: &mut Writer<Vec<u8>>, suite: &Suite) -> Result<(), ReportError> {
    let mut start = BytesStart::new("testsuite");
    start.push_attribute(("name", &*xml_safe(&suite.name)));
    push_counts(&mut start, suite.tests(), suite.failures(), suite.skipped());

    if suite.cases.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for case in &suite.cases {
        write_case(writer, case)?;
    }
    emit(writer, Event::End(BytesEnd::new("testsuite")))
}

fn write_case(writer: &mut Writer<Vec<u8>>, case: &TestCaseRecord) -> Result<(), ReportError> {
    let mut start = BytesStart::new("testcase");
    start.push_attribute(("name", &*xml_safe(&case.name)));
    start.push_attribute(("classname", &*xml_safe(&case.classname)));

    let (tag, message, output) = match case.status {
        CaseStatus::Passed => return emit(writer, Event::Empty(start)),
        CaseStatus::Skipped { ref message, ref output } => ("skipped", message, output),
        CaseStatus::Failed { ref message, ref output } => ("failure", message, output),
    };

    emit(writer, Event::Start(start))?;
    let mut detail = BytesStart::new(tag);
    detail.push_attribute(("message", &*xml_safe(message)));
    detail.push_attribute(("output", &*xml_safe(output)));
    emit(writer, Event::Empty(detail))?;
    emit(writer, Event::End(BytesEnd::new("testcase")))
}

fn push_counts(start: &mut BytesStart<'_>, tests: usize, failures: usize, skipped: usize) {
    start.push_attribute(("tests", tests.to_string().as_str()));
    start.push_attribute(("failures", failures.to_string().as_str()));
    start.push_attribute(("errors", "0"));
    start.push_attribute(("skipped", skipped.to_string().as_str()));
}

/// Drop characters XML 1.0 cannot carry (ANSI escapes, NUL, ...).
fn xml_safe(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ReportError> {
    writer.write_event(event).map_err(ReportError::xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_case_line;

    fn set_with(lines: &[&str], key: &str) -> SuiteSet {
        let mut set = SuiteSet::new();
        for line in lines {
            let parsed = parse_case_line(line).unwrap();
            set.push(key, TestCaseRecord::from_line(&parsed, key));
        }
        set
    }

    #[test]
    fn test_render_document() {
        let set = set_with(
            &[
                "test_foo.c:10:test_should_pass:PASS",
                "test_foo.c:15:test_should_fail:FAIL:expected 1 but was 2",
                "test_foo.c:20:test_should_skip:IGNORE:not implemented",
            ],
            "test_foo.testfail",
        );

        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites tests="3" failures="1" errors="0" skipped="1">
    <testsuite name="test_foo.testfail" tests="3" failures="1" errors="0" skipped="1">
        <testcase name="test_should_pass" classname="test_foo"/>
        <testcase name="test_should_fail" classname="test_foo">
            <failure message="expected 1 but was 2" output="[File]=test_foo.c, [Line]=15"/>
        </testcase>
        <testcase name="test_should_skip" classname="test_foo">
            <skipped message="not implemented" output="[File]=test_foo.c, [Line]=20"/>
        </testcase>
    </testsuite>
</testsuites>
"#;
        assert_eq!(to_xml(&set).unwrap(), expected);
    }

    #[test]
    fn test_escapes_attributes() {
        let set = set_with(&[r#"t.c:3:test_cmp:FAIL:Expected "a" <b> & c"#], "t.testfail");
        let xml = to_xml(&set).unwrap();
        assert!(xml.contains(r#"message="Expected &quot;a&quot; &lt;b&gt; &amp; c""#), "{}", xml);
    }

    #[test]
    fn test_strips_illegal_xml_chars() {
        let set = set_with(
            &["t.c:3:test_x:FAIL:Expected \u{1b}[31m1\u{1b}[0m Was \u{0}2"],
            "t.testfail",
        );
        let xml = to_xml(&set).unwrap();
        assert!(!xml.contains('\u{1b}'), "{:?}", xml);
        assert!(!xml.contains('\u{0}'), "{:?}", xml);
        assert!(xml.contains(r#"message="Expected [31m1[0m Was 2""#), "{}", xml);
    }

    #[test]
    fn test_xml_safe_keeps_legal_text() {
        assert!(matches!(xml_safe("tab\there é ✓"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("a\u{7}b\u{FFFE}c"), "abc");
    }

    #[test]
    fn test_write_report_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/out.xml");
        let err = write_report(&SuiteSet::new(), &path).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Io);
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_empty_set() {
        let xml = to_xml(&SuiteSet::new()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<testsuites tests="0" failures="0" errors="0" skipped="0">"#));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.xml");
        let set = set_with(&["a.c:1:test_a:PASS"], "a.testpass");
        write_report(&set, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"<testcase name="test_a" classname="a"/>"#));
    }
}
