
use pretty_assertions::assert_eq;
use termseq::{wrap, CapabilityRegistry, SequenceTextWrapper, WrapOptions};

fn assert_wrap_fixture(input: &str, options: WrapOptions, expected_fixture: &str) {
    let registry = CapabilityRegistry::ansi().expect("ansi registry");
    let width = options.width;
    let actual = SequenceTextWrapper::new(&registry, options)
        .expect("valid options")
        .wrap(input);
    let expected = fixture::read_expected_lines(expected_fixture);
    assert_eq!(
        actual, expected,
        "wrap golden mismatch for {expected_fixture} at width={width}"
    );
}

#[test]
fn wrap_styled_paragraph_golden() {
    assert_wrap_fixture(
        "The \x1b[1mquick\x1b[0m brown \x1b[31mfox\x1b[0m jumps over the lazy dog",
        WrapOptions::new(20),
        "wrap_styled_paragraph.txt",
    );
}

#[test]
fn wrap_wide_indented_golden() {
    let options = WrapOptions {
        initial_indent: "> ".to_string(),
        subsequent_indent: "  ".to_string(),
        ..WrapOptions::new(10)
    };
    assert_wrap_fixture("日本語のテキストを折り返す", options, "wrap_wide_indented.txt");
}

#[test]
fn wrap_max_lines_styled_golden() {
    let options = WrapOptions {
        max_lines: Some(2),
        placeholder: " ...".to_string(),
        ..WrapOptions::new(16)
    };
    assert_wrap_fixture(
        "\x1b[32mstatus:\x1b[0m all systems nominal and running",
        options,
        "wrap_max_lines_styled.txt",
    );
}

#[test]
fn wrap_hyphenated_golden() {
    assert_wrap_fixture(
        "a well-known state-of-the-art solution",
        WrapOptions::new(12),
        "wrap_hyphenated.txt",
    );
}

#[test]
fn wrap_paragraphs_golden() {
    let registry = CapabilityRegistry::ansi().expect("ansi registry");
    let actual = wrap(
        "first paragraph here\n\nsecond one",
        &registry,
        WrapOptions::new(10),
    )
    .expect("valid options");
    assert_eq!(actual, fixture::read_expected_lines("wrap_paragraphs.txt"));
}
