//! # Markup Events
//!
//! Events are the intermediate representation between lexing and document
//! building. The parser emits a **flat sequence** of events:
//!
//! ```text
//! Start(Paragraph)
//!   Text("Read ")
//!   Start(Span, data-anchor-id="c1")
//!     Text("this")
//!   End(Span)
//! End(Paragraph)
//! ```
//!
//! Nesting is not validated here. Unknown elements are dropped (their text
//! survives), adjacent text runs are merged, and entities are decoded.

use crate::lexer::{TokenKind, lex};
use crate::tag::{Attributes, Tag};

/// An event emitted while reading markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An element opened.
    Start { tag: Tag, attrs: Attributes },
    /// An element closed.
    End { tag: Tag },
    /// Decoded character data.
    Text(String),
}

/// Parse markup into events. Never fails.
pub fn parse(input: &str) -> Vec<Event> {
    let mut events = Vec::new();

    for token in lex(input) {
        match token.kind {
            TokenKind::OpenTag => {
                let inner = token.text.trim_start_matches('<').trim_end_matches('>');
                let self_closing = inner.ends_with('/');
                let inner = inner.trim_end_matches('/');
                let name_end = inner
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(inner.len());
                let tag = Tag::from_name(&inner[..name_end]);
                if tag == Tag::Unknown {
                    continue;
                }
                let attrs = Attributes::parse(&inner[name_end..]);
                events.push(Event::Start { tag, attrs });
                if self_closing {
                    events.push(Event::End { tag });
                }
            }
            TokenKind::CloseTag => {
                let name = token.text[2..].trim_end_matches('>').trim();
                let tag = Tag::from_name(name);
                if tag != Tag::Unknown {
                    events.push(Event::End { tag });
                }
            }
            TokenKind::Text => push_text(&mut events, &html_escape::decode_html_entities(token.text)),
            TokenKind::Lt => push_text(&mut events, "<"),
        }
    }

    events
}

fn push_text(events: &mut Vec<Event>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Event::Text(previous)) = events.last_mut() {
        previous.push_str(text);
    } else {
        events.push(Event::Text(text.to_string()));
    }
}
