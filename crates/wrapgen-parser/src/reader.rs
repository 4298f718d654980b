//! The lexical word reader.
//!
//! Turns header text into a stream of syntactic words with single-word
//! lookahead. Whitespace, ordinary comments, and preprocessor lines are
//! skipped; `///` doc blocks are captured out-of-band and ride on the next
//! real word, already parsed into [`DocComment`] variants.

use wrapgen_core::{DocComment, Span};

/// Classification of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric literal, radix prefix included (`42`, `0xFF`).
    Number,
    /// Punctuation; `::` is one word, everything else single-character.
    Punct,
}

/// A syntactic word with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub kind: WordKind,
    pub span: Span,
    /// The doc block that immediately preceded this word, if any. `None`
    /// means no documentation; `Some` with zero lines means a block was
    /// present but carried no recognized tags.
    pub docs: Option<Vec<DocComment>>,
}

/// Streaming reader over one header's source text.
pub struct WordReader<'src> {
    rest: &'src str,
    line: u32,
    col: u32,
    pending_docs: Option<Vec<String>>,
    peeked: Option<Word>,
}

impl<'src> WordReader<'src> {
    /// Create a reader at the start of the source.
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            line: 1,
            col: 1,
            pending_docs: None,
            peeked: None,
        }
    }

    /// Current line number; after end of input, the last line of the file.
    pub fn line(&self) -> u32 {
        self.peeked.as_ref().map_or(self.line, |w| w.span.line)
    }

    /// Consume and return the next word, or `None` at end of input.
    pub fn next(&mut self) -> Option<Word> {
        match self.peeked.take() {
            Some(word) => Some(word),
            None => self.read_word(),
        }
    }

    /// Look at the next word without consuming it.
    pub fn peek(&mut self) -> Option<&Word> {
        if self.peeked.is_none() {
            self.peeked = self.read_word();
        }
        self.peeked.as_ref()
    }

    fn read_word(&mut self) -> Option<Word> {
        self.skip_trivia();

        let span = Span::new(self.line, self.col);
        let ch = self.peek_char()?;

        let (text, kind) = if is_ident_start(ch) {
            (self.eat_while(is_ident_continue), WordKind::Ident)
        } else if ch.is_ascii_digit() {
            // One word per literal; radix prefixes and digits only. Signs
            // are separate punctuation words.
            (
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.'),
                WordKind::Number,
            )
        } else if ch == ':' {
            self.advance();
            if self.peek_char() == Some(':') {
                self.advance();
                ("::".to_string(), WordKind::Punct)
            } else {
                (":".to_string(), WordKind::Punct)
            }
        } else {
            self.advance();
            (ch.to_string(), WordKind::Punct)
        };

        let docs = self
            .pending_docs
            .take()
            .map(|lines| DocComment::parse_block(&lines));

        Some(Word {
            text,
            kind,
            span,
            docs,
        })
    }

    /// Skip whitespace, comments, and preprocessor lines, collecting any
    /// `///` doc lines encountered along the way.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek_char().is_some_and(|c| c.is_whitespace()) {
                self.advance();
            }

            if self.rest.starts_with("///") {
                self.skip_chars(3);
                let raw = self.take_line().trim().to_string();
                self.pending_docs.get_or_insert_with(Vec::new).push(raw);
            } else if self.rest.starts_with("//") {
                self.take_line();
            } else if self.rest.starts_with("/*") {
                self.skip_chars(2);
                while !self.rest.is_empty() && !self.rest.starts_with("*/") {
                    self.advance();
                }
                self.skip_chars(2.min(self.rest.len()));
            } else if self.peek_char() == Some('#') {
                // Preprocessor directives play no part in the declaration
                // subset.
                self.take_line();
            } else {
                break;
            }
        }
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.rest = &self.rest[ch.len_utf8()..];
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += ch.len_utf8() as u32;
        }
        Some(ch)
    }

    fn skip_chars(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consume up to and including the next newline, returning the line's
    /// remaining text without the newline.
    fn take_line(&mut self) -> &'src str {
        let end = self.rest.find('\n').unwrap_or(self.rest.len());
        let line = &self.rest[..end];
        self.skip_chars(line.chars().count());
        self.advance();
        line
    }

    fn eat_while(&mut self, f: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            if !f(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
