//! Line Format Tests
//!
//! Tests for parsing, loading and writing `key=value` text.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use hcfg::format::parse_line;
use hcfg::{Hcfg, HcfgError, LoadWarning, ParseErrorKind, StoreConfig};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn load_str(text: &str) -> (Hcfg, hcfg::Result<hcfg::LoadReport>) {
    let mut cfg = Hcfg::new();
    let result = cfg.load(text.as_bytes());
    (cfg, result)
}

fn sorted_pairs(cfg: &Hcfg) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = cfg
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    pairs.sort();
    pairs
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Line Parser Tests
// =============================================================================

#[test]
fn test_parse_simple() {
    let parsed = parse_line("key=value").unwrap().unwrap();
    assert_eq!(parsed.key, "key");
    assert_eq!(parsed.value, "value");
}

#[test]
fn test_parse_lowercases_key_only() {
    let parsed = parse_line("MyKey = MyValue").unwrap().unwrap();
    assert_eq!(parsed.key, "mykey");
    assert_eq!(parsed.value, "MyValue");
}

#[test]
fn test_parse_whitespace_rules() {
    let parsed = parse_line("  \tkey \t =  \t value with  spaces \t ").unwrap().unwrap();
    assert_eq!(parsed.key, "key");
    assert_eq!(parsed.value, "value with  spaces");
}

#[test]
fn test_parse_strips_comment() {
    let parsed = parse_line("key = value # trailing comment").unwrap().unwrap();
    assert_eq!(parsed.value, "value");
}

#[test]
fn test_parse_value_may_contain_equals() {
    let parsed = parse_line("expr=a=b").unwrap().unwrap();
    assert_eq!(parsed.key, "expr");
    assert_eq!(parsed.value, "a=b");
}

#[test]
fn test_parse_empty_value() {
    let parsed = parse_line("key =").unwrap().unwrap();
    assert_eq!(parsed.key, "key");
    assert_eq!(parsed.value, "");
}

#[test]
fn test_parse_blank_and_comment_lines() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("   \t  "), Ok(None));
    assert_eq!(parse_line("# just a comment"), Ok(None));
    assert_eq!(parse_line("   # indented comment"), Ok(None));
    assert_eq!(parse_line("\r"), Ok(None));
}

#[test]
fn test_parse_empty_key() {
    assert_eq!(parse_line("=oops"), Err(ParseErrorKind::EmptyKey));
    assert_eq!(parse_line("   = value"), Err(ParseErrorKind::EmptyKey));
}

#[test]
fn test_parse_missing_separator() {
    assert_eq!(parse_line("novalue"), Err(ParseErrorKind::MissingSeparator));
    assert_eq!(parse_line("two words = x"), Err(ParseErrorKind::MissingSeparator));
    assert_eq!(parse_line("key # = hidden"), Err(ParseErrorKind::MissingSeparator));
}

#[test]
fn test_parse_crlf() {
    let parsed = parse_line("key=value\r").unwrap().unwrap();
    assert_eq!(parsed.value, "value");
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_basic_document() {
    let (cfg, result) = load_str("Alpha = 1\n# comment\n\nBeta=2\n");
    let report = result.unwrap();

    assert_eq!(sorted_pairs(&cfg), pairs(&[("alpha", "1"), ("beta", "2")]));
    assert_eq!(report.lines, 4);
    assert_eq!(report.entries, 2);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_load_empty_key_fails() {
    let (cfg, result) = load_str("=oops\n");

    match result {
        Err(HcfgError::Parse { line, kind }) => {
            assert_eq!(line, 1);
            assert_eq!(kind, ParseErrorKind::EmptyKey);
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
    assert!(cfg.is_empty());
}

#[test]
fn test_load_missing_separator_reports_line() {
    let (_, result) = load_str("a=1\n\n# c\nbroken line\nb=2\n");

    match result {
        Err(HcfgError::Parse { line, kind }) => {
            assert_eq!(line, 4);
            assert_eq!(kind, ParseErrorKind::MissingSeparator);
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_load_error_keeps_earlier_entries() {
    let (cfg, result) = load_str("a=1\nb=2\n=bad\nc=3\n");

    assert!(result.is_err());
    assert_eq!(sorted_pairs(&cfg), pairs(&[("a", "1"), ("b", "2")]));
}

#[test]
fn test_load_error_message() {
    let (_, result) = load_str("ok=1\nnope\n");
    let message = result.unwrap_err().to_string();
    assert_eq!(
        message,
        "Config parse error: Line 2: No key/value separator character (=)"
    );
}

#[test]
fn test_load_duplicate_key_warns_and_overwrites() {
    let (cfg, result) = load_str("key=first\nKEY=second\n");
    let report = result.unwrap();

    assert_eq!(cfg.get("key"), Some("second"));
    assert_eq!(cfg.len(), 1);
    assert_eq!(
        report.warnings,
        vec![LoadWarning::Redefinition {
            line: 2,
            key: "key".to_string()
        }]
    );
}

#[test]
fn test_load_into_populated_store_warns_on_existing() {
    let mut cfg = Hcfg::new();
    cfg.set("a", Some("old")).unwrap();

    let report = cfg.load("a=new\nb=2\n".as_bytes()).unwrap();
    assert_eq!(cfg.get("a"), Some("new"));
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_load_last_line_without_newline() {
    let (cfg, result) = load_str("a=1\nb=2");
    result.unwrap();
    assert_eq!(cfg.get("b"), Some("2"));
}

#[test]
fn test_load_crlf_document() {
    let (cfg, result) = load_str("a = 1\r\nb=2\r\n");
    result.unwrap();
    assert_eq!(sorted_pairs(&cfg), pairs(&[("a", "1"), ("b", "2")]));
}

#[test]
fn test_load_invalid_utf8() {
    let mut cfg = Hcfg::new();
    let result = cfg.load(&b"a=1\nb=\xff\xfe\n"[..]);

    match result {
        Err(HcfgError::Parse { line, kind }) => {
            assert_eq!(line, 2);
            assert_eq!(kind, ParseErrorKind::InvalidUtf8);
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
    assert_eq!(cfg.get("a"), Some("1"));
}

#[test]
fn test_load_overlong_line_is_skipped() {
    let config = StoreConfig::builder().line_buffer_size(16).build();
    let mut cfg = Hcfg::with_config(config).unwrap();

    let text = format!("a=1\nlong={}\nb=2\n", "x".repeat(100));
    let report = cfg.load(text.as_bytes()).unwrap();

    assert_eq!(sorted_pairs(&cfg), pairs(&[("a", "1"), ("b", "2")]));
    assert_eq!(report.warnings, vec![LoadWarning::LineOverflow { line: 2 }]);
    assert_eq!(report.lines, 3);
}

#[test]
fn test_load_long_lines_with_default_buffer() {
    let value = "v".repeat(3000);
    let text: String = (0..10).map(|i| format!("key{}={}\n", i, value)).collect();

    let (cfg, result) = load_str(&text);
    result.unwrap();
    assert_eq!(cfg.len(), 10);
    assert_eq!(cfg.get("key9"), Some(value.as_str()));
}

#[test]
fn test_load_does_not_close_stream() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.cfg");
    std::fs::write(&path, "a=1\n=bad\n").unwrap();

    let mut file = File::open(&path).unwrap();
    let mut cfg = Hcfg::new();
    assert!(cfg.load(&mut file).is_err());

    // Caller still owns a usable handle
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "a=1\n=bad\n");
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_format() {
    let mut cfg = Hcfg::new();
    cfg.set("only", Some("entry")).unwrap();

    let mut out = Vec::new();
    cfg.write(&mut out).unwrap();
    assert_eq!(out, b"only=entry\n");
}

#[test]
fn test_write_empty_store() {
    let cfg = Hcfg::new();
    let mut out = Vec::new();
    cfg.write(&mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_write_emits_every_entry_in_slot_order() {
    let mut cfg = Hcfg::new();
    for i in 0..50 {
        cfg.set(&format!("k{}", i), Some(&i.to_string())).unwrap();
    }

    let mut out = Vec::new();
    cfg.write(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected: String = cfg.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect();
    assert_eq!(text, expected);
    assert_eq!(text.lines().count(), 50);
}

#[test]
fn test_write_then_load_round_trip() {
    let mut src = Hcfg::new();
    src.set("Strategy", Some("nm.so")).unwrap();
    src.set("init_percent", Some("0.35")).unwrap();
    src.set("path", Some("/usr/lib/harmony plugins")).unwrap();

    let mut out = Vec::new();
    src.write(&mut out).unwrap();

    let mut dst = Hcfg::new();
    dst.load(Cursor::new(out)).unwrap();

    assert_eq!(
        sorted_pairs(&dst),
        pairs(&[
            ("init_percent", "0.35"),
            ("path", "/usr/lib/harmony plugins"),
            ("strategy", "nm.so"),
        ])
    );
}

#[test]
fn test_write_then_load_loses_comment_characters() {
    // No escaping: '#' starts a comment and surrounding spaces are trimmed
    let mut src = Hcfg::new();
    src.set("color", Some("#ff0000")).unwrap();
    src.set("padded", Some("  x  ")).unwrap();

    let mut out = Vec::new();
    src.write(&mut out).unwrap();

    let mut dst = Hcfg::new();
    dst.load(out.as_slice()).unwrap();

    assert_eq!(dst.get("color"), Some(""));
    assert_eq!(dst.get("padded"), Some("x"));
}

#[test]
fn test_write_path_and_load_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.cfg");

    let mut src = Hcfg::new();
    src.set("a", Some("1")).unwrap();
    src.set("b", Some("2")).unwrap();
    src.write_path(&path).unwrap();

    let mut dst = Hcfg::new();
    let report = dst.load_path(&path).unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(sorted_pairs(&dst), sorted_pairs(&src));
}

#[test]
fn test_load_path_missing_file() {
    let temp = TempDir::new().unwrap();
    let mut cfg = Hcfg::new();
    let result = cfg.load_path(temp.path().join("missing.cfg"));
    assert!(matches!(result, Err(HcfgError::Io(_))));
}

#[test]
fn test_load_from_handwritten_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("harmony.cfg");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "# Session defaults").unwrap();
    writeln!(file, "SERVER_PORT = 1979   # default port").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "  Strategy=pro.so").unwrap();
    drop(file);

    let mut cfg = Hcfg::new();
    cfg.load_path(&path).unwrap();
    assert_eq!(cfg.get_int("server_port").unwrap(), Some(1979));
    assert_eq!(cfg.get("strategy"), Some("pro.so"));
}
