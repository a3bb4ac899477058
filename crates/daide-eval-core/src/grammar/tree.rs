//! Parse tree for DAIDE messages and its structured visitor.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A node of a parsed DAIDE message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderNode {
    /// Keyword, power, province or number (e.g. `PRP`, `FRA`, `1901`)
    Token(String),

    /// Quoted string literal, without its quotes
    Text(String),

    /// Parenthesised group
    Group(Vec<OrderNode>),
}

/// A parsed DAIDE message: the sequence of top-level nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTree {
    pub nodes: Vec<OrderNode>,
}

impl OrderTree {
    pub fn new(nodes: Vec<OrderNode>) -> Self {
        Self { nodes }
    }

    /// The leading keyword, if the message starts with one.
    pub fn keyword(&self) -> Option<&str> {
        match self.nodes.first() {
            Some(OrderNode::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// Every token in the tree, depth first.
    pub fn tokens(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [OrderNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    OrderNode::Token(token) => out.push(token),
                    OrderNode::Text(_) => {}
                    OrderNode::Group(children) => collect(children, out),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[OrderNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

impl fmt::Display for OrderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderNode::Token(token) => f.write_str(token),
            OrderNode::Text(text) => write!(f, "'{}'", text),
            OrderNode::Group(children) => {
                f.write_str("(")?;
                write_nodes(f, children)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for OrderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

/// Walk a parse tree into a structured JSON value.
///
/// Tokens become strings, string literals become `{"string": ...}` objects
/// and groups become arrays. The top level is always an array.
pub fn visit(tree: &OrderTree) -> Value {
    Value::Array(tree.nodes.iter().map(visit_node).collect())
}

fn visit_node(node: &OrderNode) -> Value {
    match node {
        OrderNode::Token(token) => Value::String(token.clone()),
        OrderNode::Text(text) => json!({ "string": text }),
        OrderNode::Group(children) => Value::Array(children.iter().map(visit_node).collect()),
    }
}
