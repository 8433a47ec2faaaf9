//! JSON tree form of a document.
//!
//! ```json
//! {"type": "doc", "content": [
//!   {"type": "paragraph", "content": [
//!     {"type": "text", "text": "Read "},
//!     {"type": "text", "text": "this", "marks": [{"type": "anchor", "attrs": {"id": "c1"}}]}
//!   ]}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::io::SerializeError;
use crate::models::{Block, BlockKind, Document, Mark, TextLeaf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonNode {
    Doc {
        #[serde(default)]
        content: Vec<JsonNode>,
    },
    Paragraph {
        #[serde(default)]
        content: Vec<JsonNode>,
    },
    Heading {
        attrs: HeadingAttrs,
        #[serde(default)]
        content: Vec<JsonNode>,
    },
    Blockquote {
        #[serde(default)]
        content: Vec<JsonNode>,
    },
    CodeBlock {
        #[serde(default)]
        content: Vec<JsonNode>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HeadingAttrs {
    level: u8,
}

impl JsonNode {
    fn type_name(&self) -> &'static str {
        match self {
            JsonNode::Doc { .. } => "doc",
            JsonNode::Paragraph { .. } => "paragraph",
            JsonNode::Heading { .. } => "heading",
            JsonNode::Blockquote { .. } => "blockquote",
            JsonNode::CodeBlock { .. } => "code_block",
            JsonNode::Text { .. } => "text",
        }
    }
}

pub fn to_json_value(doc: &Document) -> Result<serde_json::Value, SerializeError> {
    Ok(serde_json::to_value(document_node(doc))?)
}

pub fn to_json(doc: &Document) -> Result<String, SerializeError> {
    Ok(serde_json::to_string(&document_node(doc))?)
}

pub fn to_json_pretty(doc: &Document) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(&document_node(doc))?)
}

pub fn from_json(input: &str) -> Result<Document, SerializeError> {
    let node: JsonNode = serde_json::from_str(input)?;
    document_from_node(node)
}

pub fn from_json_value(value: serde_json::Value) -> Result<Document, SerializeError> {
    let node: JsonNode = serde_json::from_value(value)?;
    document_from_node(node)
}

fn document_node(doc: &Document) -> JsonNode {
    JsonNode::Doc {
        content: doc.blocks().iter().map(block_node).collect(),
    }
}

fn block_node(block: &Block) -> JsonNode {
    let content = block
        .leaves()
        .iter()
        .map(|leaf| JsonNode::Text {
            text: leaf.text.clone(),
            marks: leaf.marks.clone(),
        })
        .collect();
    match block.kind() {
        BlockKind::Paragraph => JsonNode::Paragraph { content },
        BlockKind::Heading { level } => JsonNode::Heading {
            attrs: HeadingAttrs { level },
            content,
        },
        BlockKind::Quote => JsonNode::Blockquote { content },
        BlockKind::CodeBlock => JsonNode::CodeBlock { content },
    }
}

fn document_from_node(node: JsonNode) -> Result<Document, SerializeError> {
    let JsonNode::Doc { content } = node else {
        return Err(SerializeError::UnexpectedNode {
            expected: "doc",
            found: node.type_name(),
        });
    };
    let blocks = content
        .into_iter()
        .map(block_from_node)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Document::from_blocks(blocks))
}

fn block_from_node(node: JsonNode) -> Result<Block, SerializeError> {
    let (kind, content) = match node {
        JsonNode::Paragraph { content } => (BlockKind::Paragraph, content),
        JsonNode::Heading { attrs, content } => (BlockKind::heading(attrs.level)?, content),
        JsonNode::Blockquote { content } => (BlockKind::Quote, content),
        JsonNode::CodeBlock { content } => (BlockKind::CodeBlock, content),
        other => {
            return Err(SerializeError::UnexpectedNode {
                expected: "block",
                found: other.type_name(),
            });
        }
    };
    let leaves = content
        .into_iter()
        .map(|node| match node {
            JsonNode::Text { text, marks } => Ok(TextLeaf::marked(text, marks)),
            other => Err(SerializeError::UnexpectedNode {
                expected: "text",
                found: other.type_name(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Block::new(kind, leaves))
}
