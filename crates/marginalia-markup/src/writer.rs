//! Escaping markup writer.

use crate::tag::Tag;

/// Builds markup for the [`Tag`] vocabulary, escaping text and attribute
/// values.
#[derive(Debug, Default)]
pub struct MarkupWriter {
    out: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `tag` with the given attributes, written in order.
    pub fn open(&mut self, tag: Tag, attrs: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(tag.name());
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out
                .push_str(&html_escape::encode_double_quoted_attribute(value));
            self.out.push('"');
        }
        self.out.push('>');
    }

    pub fn close(&mut self, tag: Tag) {
        self.out.push_str("</");
        self.out.push_str(tag.name());
        self.out.push('>');
    }

    pub fn text(&mut self, text: &str) {
        self.out.push_str(&html_escape::encode_text(text));
    }

    pub fn finish(self) -> String {
        self.out
    }
}
