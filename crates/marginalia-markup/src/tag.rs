//! Tag vocabulary and attribute decoding.

use std::sync::LazyLock;

use regex::Regex;

/// Elements understood by the markup layer.
///
/// Anything else parses as [`Tag::Unknown`] and is dropped by the event
/// parser, keeping its text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<p>`
    Paragraph,
    /// `<h1>` .. `<h6>`
    Heading(u8),
    /// `<blockquote>`
    Quote,
    /// `<pre>`
    CodeBlock,
    /// `<strong>` (also read from `<b>`)
    Strong,
    /// `<em>` (also read from `<i>`)
    Emphasis,
    /// `<code>`
    Code,
    /// `<span>`, the anchor element when it carries the id attribute
    Span,
    Unknown,
}

impl Tag {
    /// Resolve an element name, case-insensitively.
    pub fn from_name(name: &str) -> Tag {
        match name.to_ascii_lowercase().as_str() {
            "p" => Tag::Paragraph,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "blockquote" => Tag::Quote,
            "pre" => Tag::CodeBlock,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "code" => Tag::Code,
            "span" => Tag::Span,
            _ => Tag::Unknown,
        }
    }

    /// Canonical element name used when writing.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Paragraph => "p",
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Quote => "blockquote",
            Tag::CodeBlock => "pre",
            Tag::Strong => "strong",
            Tag::Emphasis => "em",
            Tag::Code => "code",
            Tag::Span => "span",
            Tag::Unknown => "div",
        }
    }

    /// Block-level elements start a new block; everything else is inline.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Paragraph | Tag::Heading(_) | Tag::Quote | Tag::CodeBlock
        )
    }
}

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Decoded attributes of an open tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Parse the attribute portion of an open tag (everything after the name).
    ///
    /// Values are entity-decoded. Attributes without a value get an empty
    /// string. Malformed fragments are skipped.
    pub fn parse(source: &str) -> Self {
        let attrs = ATTRIBUTE
            .captures_iter(source)
            .map(|caps| {
                let name = caps[1].to_ascii_lowercase();
                let raw = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                let value = html_escape::decode_html_entities(raw).into_owned();
                (name, value)
            })
            .collect();
        Self(attrs)
    }

    /// First value for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<Vec<(String, String)>> for Attributes {
    fn from(attrs: Vec<(String, String)>) -> Self {
        Self(attrs)
    }
}
