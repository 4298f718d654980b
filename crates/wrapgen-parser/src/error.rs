//! Parse error types.
//!
//! Every error pins the originating header path and 1-based line number.
//! Parse errors are fatal for the file being parsed: the parser makes no
//! attempt at recovery.

use thiserror::Error;

/// A positioned, fatal parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{file}:{line}: unexpected end of input while parsing {context}")]
    UnexpectedEof {
        file: String,
        line: u32,
        context: String,
    },

    #[error("{file}:{line}: expected {expected}, found '{found}'")]
    Unexpected {
        file: String,
        line: u32,
        expected: String,
        found: String,
    },

    #[error("{file}:{line}: declaration of '{name}' is missing its ';' terminator")]
    UnterminatedDeclaration {
        file: String,
        line: u32,
        name: String,
    },
}

impl ParseError {
    /// The header file the error occurred in.
    pub fn file(&self) -> &str {
        match self {
            ParseError::UnexpectedEof { file, .. }
            | ParseError::Unexpected { file, .. }
            | ParseError::UnterminatedDeclaration { file, .. } => file,
        }
    }

    /// The 1-based line the error occurred on.
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnexpectedEof { line, .. }
            | ParseError::Unexpected { line, .. }
            | ParseError::UnterminatedDeclaration { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_position() {
        let err = ParseError::UnterminatedDeclaration {
            file: "test.h".to_string(),
            line: 4,
            name: "FunctionName".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("test.h:4"));
        assert!(text.contains("FunctionName"));
        assert!(text.contains("';' terminator"));
    }
}
