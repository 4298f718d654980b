//! Doc-comment translation to C# XML documentation.
//!
//! Tag semantics are shared across backends; the XML spelling here is this
//! backend's own. Descriptor text (`<type-desc>: <text>`) is cut at the
//! last colon that is not part of a `::` namespace separator.

use wrapgen_core::DocComment;

/// Translate a declaration's doc block into XML documentation lines.
/// Absent documentation renders as no lines at all.
pub(crate) fn translate_comments(docs: Option<&Vec<DocComment>>) -> Vec<String> {
    match docs {
        None => Vec::new(),
        Some(list) => list.iter().map(translate_line).collect(),
    }
}

fn translate_line(line: &DocComment) -> String {
    match line {
        DocComment::Brief(text) => format!("<summary>{}</summary>", escape_angle(text)),
        DocComment::Note(text) | DocComment::Free(text) => {
            format!("<remarks>{}</remarks>", escape_angle(text))
        }
        DocComment::Return(rest) => {
            format!("<returns>{}</returns>", strip_descriptor(&escape_angle(rest)))
        }
        DocComment::Param { name, rest } => format!(
            "<param name=\"{}\">{}</param>",
            name,
            strip_descriptor(&escape_angle(rest))
        ),
    }
}

/// Extract the description from a `<type-desc>: <text>` descriptor.
///
/// Scans for the last colon that is not adjacent to another colon (a `::`
/// is a namespace separator, not a delimiter), discards everything up to
/// and including it, trims leading whitespace, and capitalizes the first
/// character if it was lowercase. A descriptor without a delimiter is kept
/// whole. Idempotent: the returned text never contains a bare colon, so
/// re-stripping it is a no-op.
pub(crate) fn strip_descriptor(descriptor: &str) -> String {
    let bytes = descriptor.as_bytes();
    let mut delimiter = None;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b':' {
            continue;
        }
        let prev_is_colon = i > 0 && bytes[i - 1] == b':';
        let next_is_colon = bytes.get(i + 1) == Some(&b':');
        if !prev_is_colon && !next_is_colon {
            delimiter = Some(i);
        }
    }

    let text = match delimiter {
        Some(i) => descriptor[i + 1..].trim_start(),
        None => descriptor.trim(),
    };
    capitalize_first(text)
}

/// Escape angle brackets so comment text survives inside XML tags.
pub(crate) fn escape_angle(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Uppercase the first character if it is lowercase; everything else is
/// left alone.
pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_becomes_summary() {
        let docs = vec![DocComment::Brief("A widget.".to_string())];
        assert_eq!(
            translate_comments(Some(&docs)),
            vec!["<summary>A widget.</summary>".to_string()]
        );
    }

    #[test]
    fn note_and_free_text_become_remarks() {
        let docs = vec![
            DocComment::Note("Careful.".to_string()),
            DocComment::Free("More detail.".to_string()),
        ];
        let lines = translate_comments(Some(&docs));
        assert_eq!(lines[0], "<remarks>Careful.</remarks>");
        assert_eq!(lines[1], "<remarks>More detail.</remarks>");
    }

    #[test]
    fn descriptor_stripping_skips_doubled_colons() {
        assert_eq!(strip_descriptor("Foo::Bar: the result"), "The result");
    }

    #[test]
    fn descriptor_without_delimiter_is_kept_whole() {
        assert_eq!(strip_descriptor("Foo::Bar"), "Foo::Bar");
        assert_eq!(strip_descriptor("plain text"), "Plain text");
    }

    #[test]
    fn descriptor_stripping_is_idempotent() {
        let once = strip_descriptor("acme::common::String : the display name");
        assert_eq!(once, "The display name");
        assert_eq!(strip_descriptor(&once), once);

        let tricky = strip_descriptor("Map&lt;K, V&gt; : keys: values");
        assert_eq!(strip_descriptor(&tricky), tricky);
    }

    #[test]
    fn param_line_carries_name_attribute() {
        let docs = vec![DocComment::Param {
            name: "Value".to_string(),
            rest: "acme::common::String : the value".to_string(),
        }];
        assert_eq!(
            translate_comments(Some(&docs)),
            vec!["<param name=\"Value\">The value</param>".to_string()]
        );
    }

    #[test]
    fn return_line_is_stripped_and_capitalized() {
        let docs = vec![DocComment::Return("Foo::Bar: the result".to_string())];
        assert_eq!(
            translate_comments(Some(&docs)),
            vec!["<returns>The result</returns>".to_string()]
        );
    }

    #[test]
    fn angle_brackets_are_escaped() {
        let docs = vec![DocComment::Brief("An Array<T> of things.".to_string())];
        assert_eq!(
            translate_comments(Some(&docs)),
            vec!["<summary>An Array&lt;T&gt; of things.</summary>".to_string()]
        );
    }

    #[test]
    fn absent_docs_render_no_lines() {
        assert!(translate_comments(None).is_empty());
    }

    #[test]
    fn capitalization_leaves_uppercase_alone() {
        assert_eq!(capitalize_first("The result"), "The result");
        assert_eq!(capitalize_first("the RESULT"), "The RESULT");
        assert_eq!(capitalize_first(""), "");
    }
}
