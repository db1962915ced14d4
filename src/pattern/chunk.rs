//! Splitting pattern text into literal text and `<tag>` chunks.

use crate::pattern::errors::PatternError;
use std::fmt;

/// A piece of a pattern: either literal text or a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(TextChunk),
    Tag(TagChunk),
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Text(text) => text.fmt(f),
            Chunk::Tag(tag) => tag.fmt(f),
        }
    }
}

/// Literal pattern text with escapes already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    text: String,
}

impl TextChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TextChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

/// The inside of a tag: `tag` or `label:tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChunk {
    tag: String,
    label: Option<String>,
}

impl TagChunk {
    pub fn new(tag: impl Into<String>, label: Option<String>) -> Result<Self, PatternError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(PatternError::EmptyTag);
        }
        Ok(Self { tag, label })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Parse `label:tag` / `tag`. Only the first colon separates.
    fn parse(inner: &str) -> Result<Self, PatternError> {
        match inner.split_once(':') {
            Some((label, tag)) => Self::new(tag, Some(label.to_string())),
            None => Self::new(inner, None),
        }
    }
}

impl fmt::Display for TagChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}:{}", label, self.tag),
            None => f.write_str(&self.tag),
        }
    }
}

/// Tag delimiters and the escape prefix that neutralizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    start: String,
    stop: String,
    escape: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: "<".to_string(),
            stop: ">".to_string(),
            escape: "\\".to_string(),
        }
    }
}

impl Delimiters {
    pub fn new(
        start: impl Into<String>,
        stop: impl Into<String>,
        escape: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let (start, stop, escape) = (start.into(), stop.into(), escape.into());
        if start.is_empty() {
            return Err(PatternError::EmptyStartDelimiter);
        }
        if stop.is_empty() {
            return Err(PatternError::EmptyStopDelimiter);
        }
        if escape.is_empty() {
            return Err(PatternError::EmptyEscape);
        }
        Ok(Self {
            start,
            stop,
            escape,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn stop(&self) -> &str {
        &self.stop
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    /// Split `pattern` into text and tag chunks.
    ///
    /// An escape immediately before a delimiter hides that delimiter from tag
    /// detection; the escape strings themselves are stripped from text chunks.
    /// A pattern without tags is a single text chunk, possibly empty. Adjacent
    /// tags are separated by an empty text chunk.
    pub fn split(&self, pattern: &str) -> Result<Vec<Chunk>, PatternError> {
        let escaped_start = format!("{}{}", self.escape, self.start);
        let escaped_stop = format!("{}{}", self.escape, self.stop);

        let mut starts = Vec::new();
        let mut stops = Vec::new();
        let mut p = 0;
        while p < pattern.len() {
            let rest = &pattern[p..];
            if rest.starts_with(&escaped_start) {
                p += escaped_start.len();
            } else if rest.starts_with(&escaped_stop) {
                p += escaped_stop.len();
            } else if rest.starts_with(&self.start) {
                starts.push(p);
                p += self.start.len();
            } else if rest.starts_with(&self.stop) {
                stops.push(p);
                p += self.stop.len();
            } else {
                p += rest.chars().next().map_or(1, char::len_utf8);
            }
        }

        if starts.len() > stops.len() {
            return Err(PatternError::UnterminatedTag {
                pattern: pattern.to_string(),
            });
        }
        if starts.len() < stops.len() {
            return Err(PatternError::MissingStartTag {
                pattern: pattern.to_string(),
            });
        }
        for (i, (&start, &stop)) in starts.iter().zip(&stops).enumerate() {
            let after_previous = i == 0 || start >= stops[i - 1] + self.stop.len();
            if start >= stop || !after_previous {
                return Err(PatternError::DelimitersOutOfOrder {
                    pattern: pattern.to_string(),
                });
            }
        }

        if starts.is_empty() {
            return Ok(vec![self.text_chunk(pattern)]);
        }

        let mut chunks = Vec::new();
        if starts[0] > 0 {
            chunks.push(self.text_chunk(&pattern[..starts[0]]));
        }
        for (i, (&start, &stop)) in starts.iter().zip(&stops).enumerate() {
            let inner = &pattern[start + self.start.len()..stop];
            chunks.push(Chunk::Tag(TagChunk::parse(inner)?));

            let after = stop + self.stop.len();
            match starts.get(i + 1) {
                Some(&next) => chunks.push(self.text_chunk(&pattern[after..next])),
                None if after < pattern.len() => chunks.push(self.text_chunk(&pattern[after..])),
                None => {}
            }
        }
        Ok(chunks)
    }

    fn text_chunk(&self, raw: &str) -> Chunk {
        Chunk::Text(TextChunk::new(raw.replace(&self.escape, "")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn split(pattern: &str) -> String {
        render(&Delimiters::default().split(pattern).unwrap())
    }

    #[test]
    fn text_and_tags() {
        assert_eq!(split("<ID> = <expr> ;"), "ID, ' = ', expr, ' ;'");
        assert_eq!(split(" <ID> = <expr>"), "' ', ID, ' = ', expr");
        assert_eq!(split("<ID> = <expr>"), "ID, ' = ', expr");
        assert_eq!(split("<expr>"), "expr");
        assert_eq!(split("<ID>x"), "ID, 'x'");
    }

    #[test]
    fn adjacent_tags_keep_empty_text_between() {
        assert_eq!(split("<ID><expr>"), "ID, '', expr");
        assert_eq!(split("<a:ID><b:ID>;"), "a:ID, '', b:ID, ';'");
    }

    #[test]
    fn plain_text() {
        assert_eq!(split("x = 1;"), "'x = 1;'");
        assert_eq!(
            Delimiters::default().split("").unwrap(),
            vec![Chunk::Text(TextChunk::new(""))]
        );
    }

    #[test]
    fn labels_split_on_first_colon() {
        assert_eq!(split("<lhs:ID> = <a:b:expr>"), "lhs:ID, ' = ', a:b:expr");
        let chunks = Delimiters::default().split("<a:b:expr>").unwrap();
        match &chunks[0] {
            Chunk::Tag(tag) => {
                assert_eq!(tag.label(), Some("a"));
                assert_eq!(tag.tag(), "b:expr");
            }
            other => panic!("expected tag, got {other:?}"),
        }
    }

    #[test]
    fn escaped_delimiters_are_text() {
        assert_eq!(split("\\<x\\> = <expr>"), "'<x> = ', expr");
        assert_eq!(split("a \\<b"), "'a <b'");
    }

    #[test]
    fn unterminated() {
        let err = Delimiters::default().split("<ID = <expr> ;").unwrap_err();
        assert_eq!(err.to_string(), "unterminated tag in pattern: <ID = <expr> ;");
    }

    #[test]
    fn missing_start() {
        let err = Delimiters::default().split("ID> = <expr> ;").unwrap_err();
        assert_eq!(err.to_string(), "missing start tag in pattern: ID> = <expr> ;");
    }

    #[test]
    fn out_of_order() {
        let err = Delimiters::default().split("ID> = <expr> ;<").unwrap_err();
        assert!(matches!(err, PatternError::DelimitersOutOfOrder { .. }));
        let nested = Delimiters::default().split("<a<b>>").unwrap_err();
        assert!(matches!(nested, PatternError::DelimitersOutOfOrder { .. }));
    }

    #[test]
    fn empty_tag() {
        assert!(matches!(
            Delimiters::default().split("<> x"),
            Err(PatternError::EmptyTag)
        ));
        assert!(matches!(
            Delimiters::default().split("<lbl:>"),
            Err(PatternError::EmptyTag)
        ));
    }

    #[test]
    fn custom_delimiters() {
        let delimiters = Delimiters::new("<<", ">>", "$").unwrap();
        let chunks = delimiters.split("<<ID>> = <<expr>> <x>").unwrap();
        assert_eq!(render(&chunks), "ID, ' = ', expr, ' <x>'");
        let escaped = delimiters.split("$<<ID$>> <<e:expr>>").unwrap();
        assert_eq!(render(&escaped), "'<<ID>> ', e:expr");
    }

    #[test]
    fn empty_delimiters_rejected() {
        assert!(matches!(
            Delimiters::new("", ">", "\\"),
            Err(PatternError::EmptyStartDelimiter)
        ));
        assert!(matches!(
            Delimiters::new("<", "", "\\"),
            Err(PatternError::EmptyStopDelimiter)
        ));
        assert!(matches!(
            Delimiters::new("<", ">", ""),
            Err(PatternError::EmptyEscape)
        ));
    }

    proptest! {
        #[test]
        fn delimiter_free_text_is_one_chunk(text in "[a-z0-9 =;+*()]{1,40}") {
            let chunks = Delimiters::default().split(&text).unwrap();
            prop_assert_eq!(chunks, vec![Chunk::Text(TextChunk::new(text.clone()))]);
        }

        #[test]
        fn tags_survive_between_text(
            before in "[a-z =;]{0,10}",
            tag in "[A-Za-z]{1,8}",
            after in "[a-z =;]{0,10}",
        ) {
            let pattern = format!("{before}<{tag}>{after}");
            let chunks = Delimiters::default().split(&pattern).unwrap();
            let tags: Vec<_> = chunks
                .iter()
                .filter_map(|c| match c {
                    Chunk::Tag(t) => Some(t.tag().to_string()),
                    Chunk::Text(_) => None,
                })
                .collect();
            prop_assert_eq!(tags, vec![tag]);
            let expected = usize::from(!before.is_empty()) + 1 + usize::from(!after.is_empty());
            prop_assert_eq!(chunks.len(), expected);
        }
    }
}
