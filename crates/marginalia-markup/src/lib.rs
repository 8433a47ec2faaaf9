//! # marginalia-markup
//!
//! The portable markup that marginalia documents round-trip through: a small,
//! lenient HTML subset.
//!
//! ```text
//! <p>Read <span data-anchor-id="c1">this part</span> twice.</p>
//! ```
//!
//! Annotation anchors travel as an inline element carrying exactly one
//! identifying attribute. Nothing else about an annotation (author, message,
//! status) is ever written into the markup.
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events
//!               (Logos)          (tags + attributes)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits input into open tags, close tags, text runs and stray `<`
//! characters. Every byte of the input lands in exactly one token; input the
//! lexer does not recognise becomes text rather than an error.
//!
//! ### 2. Parser ([`event`] module)
//!
//! Turns tokens into a flat list of [`Event`]s (`Start`, `End`, `Text`).
//! Tag names are resolved to [`Tag`], attributes are decoded, entities in
//! text are unescaped. The parser does not enforce nesting: building a
//! document out of the events (and recovering from unclosed or stray tags)
//! is the consumer's job.
//!
//! ### 3. Writer ([`writer`] module)
//!
//! [`MarkupWriter`] emits escaped markup for the same tag vocabulary.
//!
//! ## Quick Start
//!
//! ```
//! use marginalia_markup::{parse, Event, Tag};
//!
//! let events = parse(r#"<p>a <span data-anchor-id="c1">b</span></p>"#);
//! assert!(matches!(events[0], Event::Start { tag: Tag::Paragraph, .. }));
//! ```

pub mod event;
pub mod lexer;
pub mod tag;
pub mod writer;

pub use event::{Event, parse};
pub use tag::{Attributes, Tag};
pub use writer::MarkupWriter;
