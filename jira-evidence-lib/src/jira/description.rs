//! Plain-text rendering of issue descriptions.
//!
//! Jira returns descriptions either as a plain string or as an Atlassian Document Format
//! (ADF) tree. The tree is flattened by concatenating the text of its `text` leaves, walking
//! `paragraph` containers depth-first. Anything that yields no text falls back to a generic
//! rendering of the original value, so flattening never fails.

use serde_json::Value;

/// A node of a rich-text content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Paragraph(Vec<Self>),
    Text(String),

    /// Any node kind that does not contribute text
    Other,
}

impl ContentNode {
    /// Interpret a JSON value as a content node. Malformed nodes become [`ContentNode::Other`].
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(node) = value.as_object() else {
            return Self::Other;
        };

        match node.get("type").and_then(Value::as_str) {
            Some("paragraph") => node
                .get("content")
                .and_then(Value::as_array)
                .map_or(Self::Other, |children| Self::Paragraph(children.iter().map(Self::from_value).collect())),
            Some("text") => Self::Text(node.get("text").and_then(Value::as_str).unwrap_or_default().to_string()),
            _ => Self::Other,
        }
    }

    /// Append the text of this node and its descendants to `out`.
    pub fn write_text(&self, out: &mut String) {
        match self {
            Self::Paragraph(children) => children.iter().for_each(|child| child.write_text(out)),
            Self::Text(text) => out.push_str(text),
            Self::Other => {}
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

/// The possible shapes of a description field
#[derive(Debug, Clone, PartialEq)]
pub enum Description<'a> {
    Absent,

    /// A structured document with an ordered list of top-level nodes
    Document { content: Vec<ContentNode>, raw: &'a Value },

    /// Anything else, including plain strings
    Unstructured(&'a Value),
}

impl<'a> Description<'a> {
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Object(map) => map.get("content").and_then(Value::as_array).map_or(Self::Unstructured(value), |nodes| {
                Self::Document {
                    content: nodes.iter().map(ContentNode::from_value).collect(),
                    raw: value,
                }
            }),
            _ => Self::Unstructured(value),
        }
    }

    /// Render as plain text, falling back to a generic rendering when no text can be extracted.
    #[must_use]
    pub fn flatten(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Document { content, raw } => {
                let mut text = String::new();
                for node in content {
                    node.write_text(&mut text);
                }

                if text.is_empty() { render_generic(raw) } else { text }
            }
            Self::Unstructured(value) => render_generic(value),
        }
    }
}

/// Flatten a description value of any shape into plain text.
#[must_use]
pub fn flatten_description(value: &Value) -> String {
    Description::classify(value).flatten()
}

/// Strings render as themselves, every other value as compact JSON.
#[must_use]
pub fn render_generic(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_paragraphs() {
        let value = json!({
            "type": "paragraph",
            "content": [
                { "type": "text", "text": "A" },
                { "type": "paragraph", "content": [{ "type": "text", "text": "B" }] }
            ]
        });
        assert_eq!(flatten_description(&value), "AB");
    }

    #[test]
    fn test_flatten_adf_document() {
        let value = json!({
            "type": "doc",
            "version": 1,
            "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "Hello " },
                    { "type": "text", "text": "world", "marks": [{ "type": "strong" }] }
                ]},
                { "type": "rule" },
                { "type": "paragraph", "content": [{ "type": "text", "text": "!" }] }
            ]
        });
        assert_eq!(flatten_description(&value), "Hello world!");
    }

    #[test]
    fn test_flatten_plain_string() {
        assert_eq!(flatten_description(&json!("hello")), "hello");
    }

    #[test]
    fn test_flatten_null() {
        assert_eq!(flatten_description(&Value::Null), "");
    }

    #[test]
    fn test_flatten_document_without_text_renders_generic() {
        let value = json!({ "type": "doc", "content": [{ "type": "rule" }] });
        assert_eq!(flatten_description(&value), value.to_string());
    }

    #[test]
    fn test_flatten_object_without_content_renders_generic() {
        let value = json!({ "type": "doc" });
        assert_eq!(flatten_description(&value), r#"{"type":"doc"}"#);
    }

    #[test]
    fn test_flatten_other_values_render_generic() {
        assert_eq!(flatten_description(&json!(42)), "42");
        assert_eq!(flatten_description(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(flatten_description(&json!(true)), "true");
    }

    #[test]
    fn test_malformed_nodes_contribute_nothing() {
        let value = json!({
            "content": [
                "not a node",
                { "type": "paragraph", "content": "not a list" },
                { "type": "text", "text": 5 },
                { "type": "text", "text": "kept" },
                { "text": "untyped" }
            ]
        });
        assert_eq!(flatten_description(&value), "kept");
    }

    #[test]
    fn test_content_node_from_value() {
        let node = ContentNode::from_value(&json!({
            "type": "paragraph",
            "content": [{ "type": "text", "text": "x" }, { "type": "mention" }]
        }));
        assert_eq!(node, ContentNode::Paragraph(vec![ContentNode::Text("x".into()), ContentNode::Other]));
        assert_eq!(node.text(), "x");
    }

    #[test]
    fn test_classify() {
        assert_eq!(Description::classify(&Value::Null), Description::Absent);

        let s = json!("text");
        assert_eq!(Description::classify(&s), Description::Unstructured(&s));

        let doc = json!({ "content": [] });
        assert!(matches!(Description::classify(&doc), Description::Document { .. }));
    }
}
