// tests/format_tests.rs
use pbkdf2_key::consts::{DEFAULT_FORMAT, MAX_PAREN_DEPTH};
use pbkdf2_key::format::{b64enc, bin, render, FormatContext, Template, TemplateError};

const ITERATIONS: i64 = 100_000;

fn render_with(template: &str, salt: &[u8], key: &[u8]) -> Result<String, TemplateError> {
    render(template, &FormatContext::new(ITERATIONS, salt, key))
}

fn ok(template: &str) -> String {
    render_with(template, &[1, 2, 3], &[9, 9]).unwrap()
}

#[test]
fn test_default_format_with_zero_salt_and_key() {
    let out = render_with(DEFAULT_FORMAT, &[0u8; 16], &[0u8; 32]).unwrap();
    assert_eq!(
        out,
        "AAAAAAAAAAAAAAAAAAAAAA==:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="
    );
}

#[test]
fn test_bin_helper() {
    assert_eq!(bin(2, 100_000), Some(vec![0x86, 0xA0]));
    assert_eq!(bin(4, 100_000), Some(vec![0x00, 0x01, 0x86, 0xA0]));
    assert_eq!(bin(8, 1), Some(vec![0, 0, 0, 0, 0, 0, 0, 1]));
    assert_eq!(bin(0, 42), Some(vec![]));
    assert_eq!(bin(2, -1), Some(vec![0xFF, 0xFF]));
    assert_eq!(bin(9, 1), None);

    assert_eq!(ok("{{ printf \"%x\" (bin 2 .Iterations) }}"), "86a0");
    assert_eq!(ok("{{ bin 2 .Iterations }}"), "[134 160]");
}

#[test]
fn test_b64enc_helper() {
    assert_eq!(b64enc(b"hello"), "aGVsbG8=");
    assert_eq!(ok("{{ b64enc \"hello\" }}"), "aGVsbG8=");
    assert_eq!(ok("{{ .Key | b64enc }}"), "CQk=");
}

#[test]
fn test_packed_binary_layout() {
    assert_eq!(
        ok(r#"{{ b64enc (printf "%s%s%s" (bin 4 .Iterations) .Salt .Key) }}"#),
        "AAGGoAECAwkJ"
    );
}

#[test]
fn test_fields_print_go_style() {
    assert_eq!(ok("{{ .Iterations }}"), "100000");
    assert_eq!(ok("{{ .Salt }}"), "[1 2 3]");
    assert_eq!(ok("{{ printf \"%v|%d\" .Key .Key }}"), "[9 9]|[9 9]");
}

#[test]
fn test_printf_verbs_and_padding() {
    assert_eq!(
        ok(r#"{{ printf "%d-%08d|%-6d|%5d|%05d" 7 .Iterations 42 -3 -3 }}"#),
        "7-00100000|42    |   -3|-0003"
    );
    assert_eq!(ok(r#"{{ printf "%x %X %x" .Salt .Key 255 }}"#), "010203 0909 ff");
    assert_eq!(ok(r#"{{ printf "%X" -255 }}"#), "-FF");
    assert_eq!(ok(r#"{{ printf "100%%" }}"#), "100%");
    assert_eq!(ok(r#"{{ printf "%s" "plain" }}"#), "plain");
}

#[test]
fn test_printf_quoted_verb() {
    assert_eq!(ok(r#"{{ printf "%q" "hi" }}"#), r#""hi""#);
    assert_eq!(
        ok(r#"{{ printf "%q" "say \"yo\"\n\\" }}"#),
        r#""say \"yo\"\n\\""#
    );
    assert_eq!(ok(r#"{{ printf "%q" "héllo" }}"#), r#""héllo""#);
    assert_eq!(ok(r#"{{ printf "%q" .Salt }}"#), r#""\x01\x02\x03""#);
    assert_eq!(ok(r#"{{ printf "%q %q" 65 39 }}"#), r#"'A' '\''"#);
    assert_eq!(ok(r#"{{ printf "%q" -1 }}"#), "'\u{FFFD}'");
    assert_eq!(ok(r#"{{ printf "%8q|" "ab" }}"#), r#"    "ab"|"#);

    let raw = render_with(r#"{{ printf "%q" .Key }}"#, b"s", &[0xFF, b'A', 0xFE]).unwrap();
    assert_eq!(raw, r#""\xffA\xfe""#);
}

#[test]
fn test_deep_nesting_is_a_parse_error() {
    let nested = |depth: usize| {
        format!(
            "{{{{ {}.Key{} }}}}",
            "(".repeat(depth),
            ")".repeat(depth)
        )
    };

    assert_eq!(ok(&nested(MAX_PAREN_DEPTH)), "[9 9]");

    for depth in [MAX_PAREN_DEPTH + 1, 10_000] {
        let outcome = render_with(&nested(depth), b"salt", b"key");
        assert_eq!(
            outcome,
            Err(TemplateError::Parse {
                line: 1,
                message: "max nesting depth exceeded".into()
            })
        );
    }
}

#[test]
fn test_text_trim_markers_and_comments() {
    assert_eq!(ok("pbkdf2$ {{- .Iterations -}} $end"), "pbkdf2$100000$end");
    assert_eq!(ok("a {{/* hidden */}}b"), "a b");
    assert_eq!(ok("a  {{- /* hidden */ -}}  b"), "ab");
    assert_eq!(ok("no actions }} here"), "no actions }} here");
    assert_eq!(ok(""), "");
}

#[test]
fn test_literals() {
    assert_eq!(ok("{{ 0x10 }}"), "16");
    assert_eq!(ok("{{ `raw \\n` }}"), "raw \\n");
    assert_eq!(ok(r#"{{ "tab\there" }}"#), "tab\there");
}

#[test]
fn test_parsed_template_is_reusable() {
    let template = Template::parse("{{ b64enc .Key }}").unwrap();
    let a = template
        .render(&FormatContext::new(1, b"s", b"first"))
        .unwrap();
    let b = template
        .render(&FormatContext::new(1, b"s", b"second"))
        .unwrap();
    assert_eq!(a, "Zmlyc3Q=");
    assert_eq!(b, "c2Vjb25k");
}

#[test]
fn test_malformed_templates_fail_to_parse() {
    for template in [
        "{{ .Key",
        "{{ printf \"%s\" (b64enc .Salt }}",
        "{{ b64enc .Salt) }}",
        "{{ }}",
        "{{ \"unterminated }}",
        "{{ .Password }}",
        "{{ upper .Key }}",
        "{{ .Key .Salt }}",
        "{{/* never closed",
    ] {
        let outcome = render_with(template, b"salt", b"key");
        assert!(
            matches!(outcome, Err(TemplateError::Parse { .. })),
            "{template:?} gave {outcome:?}"
        );
    }
}

#[test]
fn test_parse_error_reports_line() {
    let err = render_with("line one\nline two {{ bogus }}", b"s", b"k").unwrap_err();
    assert_eq!(
        err,
        TemplateError::Parse {
            line: 2,
            message: "function \"bogus\" not defined".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "template: format:2: function \"bogus\" not defined"
    );
}

#[test]
fn test_execution_errors() {
    for template in [
        "{{ bin 9 .Iterations }}",
        "{{ bin -1 .Iterations }}",
        "{{ bin 2 }}",
        "{{ bin .Salt 2 }}",
        "{{ b64enc .Iterations }}",
        "{{ b64enc }}",
        "{{ printf \"%s\" .Iterations }}",
        "{{ printf \"%s %s\" .Key }}",
        "{{ printf \"%s\" .Key .Salt }}",
        "{{ printf \"%y\" .Key }}",
        "{{ printf \"%\" }}",
        "{{ printf .Key }}",
        "{{ printf \"%s\" b64enc }}",
    ] {
        let outcome = render_with(template, b"salt", b"key");
        assert!(
            matches!(outcome, Err(TemplateError::Exec { .. })),
            "{template:?} gave {outcome:?}"
        );
    }
}

#[test]
fn test_error_messages_do_not_leak_secrets() {
    let err = render_with("{{ printf \"%s %s\" .Key }}", b"pepper", b"hunter2").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("missing argument"), "{msg}");
    assert!(!msg.contains("hunter2"));
    assert!(!msg.contains("pepper"));
}

#[test]
fn test_non_utf8_output_is_rejected() {
    let outcome = render_with("{{ printf \"%s\" .Key }}", b"salt", &[0xFF, 0xFE]);
    assert_eq!(outcome, Err(TemplateError::NotUtf8));
}
