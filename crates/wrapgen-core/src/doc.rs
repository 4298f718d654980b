//! Doc-comment model.
//!
//! `///` blocks are parsed into tagged variants once, when the word reader
//! captures them. The descriptor text of `@param`/`@return` lines (the
//! `<type-desc>: <text>` part) is kept verbatim; slicing it up is a backend
//! concern, since each target language renders documentation differently.

use tracing::debug;

/// One line of a doc-comment block.
///
/// A declaration either has `Some` block (possibly with zero recognized
/// lines) or no documentation at all — callers must not conflate the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocComment {
    /// `@brief <text>` — one-line summary.
    Brief(String),
    /// `@param <name> <descriptor>` — parameter documentation. The
    /// descriptor is kept raw, including its `<type-desc>:` prefix.
    Param { name: String, rest: String },
    /// `@return <descriptor>` — return documentation, descriptor kept raw.
    Return(String),
    /// `@note <text>` — supplementary remark.
    Note(String),
    /// An untagged free-text line.
    Free(String),
}

impl DocComment {
    /// Parse one raw comment line (with the `///` prefix already removed).
    ///
    /// Returns `None` for tags outside the accepted set; those carry no
    /// meaning for any binding target and are dropped.
    pub fn from_raw(line: &str) -> Option<DocComment> {
        if !line.starts_with('@') {
            return Some(DocComment::Free(line.to_string()));
        }

        let (tag, content) = match line.find(' ') {
            Some(i) => (&line[..i], line[i + 1..].trim_start()),
            None => (line, ""),
        };

        match tag {
            "@brief" => Some(DocComment::Brief(content.to_string())),
            "@note" => Some(DocComment::Note(content.to_string())),
            "@return" => Some(DocComment::Return(content.to_string())),
            "@param" => {
                let (name, rest) = match content.find(' ') {
                    Some(i) => (&content[..i], content[i + 1..].trim_start()),
                    None => (content, ""),
                };
                Some(DocComment::Param {
                    name: name.to_string(),
                    rest: rest.to_string(),
                })
            }
            _ => {
                debug!(tag, "dropping unrecognized doc tag");
                None
            }
        }
    }

    /// Parse a captured block of raw comment lines in order.
    pub fn parse_block(lines: &[String]) -> Vec<DocComment> {
        lines.iter().filter_map(|l| Self::from_raw(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_brief() {
        assert_eq!(
            DocComment::from_raw("@brief A summary."),
            Some(DocComment::Brief("A summary.".to_string()))
        );
    }

    #[test]
    fn parse_param_keeps_descriptor_raw() {
        assert_eq!(
            DocComment::from_raw("@param Value csp::common::String : the value"),
            Some(DocComment::Param {
                name: "Value".to_string(),
                rest: "csp::common::String : the value".to_string(),
            })
        );
    }

    #[test]
    fn parse_untagged_is_free_text() {
        assert_eq!(
            DocComment::from_raw("continuation line"),
            Some(DocComment::Free("continuation line".to_string()))
        );
    }

    #[test]
    fn unknown_tags_are_dropped() {
        assert_eq!(DocComment::from_raw("@ingroup Components"), None);

        let block = vec![
            "@ingroup Components".to_string(),
            "@brief Keep this.".to_string(),
        ];
        assert_eq!(
            DocComment::parse_block(&block),
            vec![DocComment::Brief("Keep this.".to_string())]
        );
    }

    #[test]
    fn bare_tag_has_empty_content() {
        assert_eq!(
            DocComment::from_raw("@return"),
            Some(DocComment::Return(String::new()))
        );
    }
}
