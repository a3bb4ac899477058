//! Structural DAIDE grammar.
//!
//! Accepts three-letter uppercase tokens, unsigned numbers, quoted string
//! literals and balanced parenthesised groups. It does not know which
//! keywords may appear where; that is the full grammar's job.

use std::iter::Peekable;
use std::str::CharIndices;

use lazy_static::lazy_static;
use regex::Regex;

use super::{Grammar, GrammarConfig, GrammarError, OrderNode, OrderTree, StringType};

lazy_static! {
    /// Keyword, power or province (`PRP`, `FRA`, `LYO`) or a number (`1901`)
    static ref TOKEN_PATTERN: Regex = Regex::new(r"^(?:[A-Z]{3}|[0-9]+)$").unwrap();
}

/// Build a grammar for the given press level and string-literal mode.
pub fn create_grammar(config: GrammarConfig) -> Result<StructuralGrammar, GrammarError> {
    config.validate()?;
    Ok(StructuralGrammar { config })
}

/// Grammar that checks message structure and token shape.
#[derive(Debug, Clone)]
pub struct StructuralGrammar {
    config: GrammarConfig,
}

impl StructuralGrammar {
    pub fn level(&self) -> u32 {
        self.config.level
    }

    pub fn string_type(&self) -> StringType {
        self.config.string_type
    }

    fn read_word(
        &self,
        start: usize,
        first: char,
        chars: &mut Peekable<CharIndices<'_>>,
    ) -> Result<OrderNode, GrammarError> {
        let mut word = String::from(first);
        while let Some(&(_, c)) = chars.peek() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            word.push(c);
            chars.next();
        }

        if !TOKEN_PATTERN.is_match(&word) {
            return Err(GrammarError::syntax(
                start,
                format!("invalid token '{}'", word),
            ));
        }
        Ok(OrderNode::Token(word))
    }

    fn read_string(
        &self,
        start: usize,
        chars: &mut Peekable<CharIndices<'_>>,
    ) -> Result<OrderNode, GrammarError> {
        let mut text = String::new();
        while let Some((pos, c)) = chars.next() {
            if c == '\'' {
                return Ok(OrderNode::Text(text));
            }
            if !self.config.string_type.accepts(c) {
                return Err(GrammarError::syntax(
                    pos,
                    format!("character {:?} not allowed in string literal", c),
                ));
            }
            text.push(c);
        }
        Err(GrammarError::syntax(start, "unterminated string literal"))
    }
}

fn current<'a>(
    stack: &'a mut Vec<(usize, Vec<OrderNode>)>,
    top: &'a mut Vec<OrderNode>,
) -> &'a mut Vec<OrderNode> {
    match stack.last_mut() {
        Some((_, children)) => children,
        None => top,
    }
}

impl Grammar for StructuralGrammar {
    fn parse(&self, message: &str) -> Result<OrderTree, GrammarError> {
        // Open groups with the position of their '('
        let mut stack: Vec<(usize, Vec<OrderNode>)> = Vec::new();
        let mut top = Vec::new();
        let mut chars = message.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                c if c.is_whitespace() => {}
                '(' => stack.push((pos, Vec::new())),
                ')' => {
                    let (_, children) = stack
                        .pop()
                        .ok_or_else(|| GrammarError::syntax(pos, "unmatched ')'"))?;
                    if children.is_empty() {
                        return Err(GrammarError::syntax(pos, "empty group"));
                    }
                    current(&mut stack, &mut top).push(OrderNode::Group(children));
                }
                '\'' => {
                    let node = self.read_string(pos, &mut chars)?;
                    current(&mut stack, &mut top).push(node);
                }
                c if c.is_ascii_alphanumeric() => {
                    let node = self.read_word(pos, c, &mut chars)?;
                    current(&mut stack, &mut top).push(node);
                }
                other => {
                    return Err(GrammarError::syntax(
                        pos,
                        format!("unexpected character {:?}", other),
                    ));
                }
            }
        }

        if let Some((pos, _)) = stack.last() {
            return Err(GrammarError::syntax(*pos, "unclosed '('"));
        }

        match top.first() {
            None => Err(GrammarError::syntax(0, "empty message")),
            Some(OrderNode::Token(_)) => Ok(OrderTree::new(top)),
            Some(_) => Err(GrammarError::syntax(0, "message must start with a keyword")),
        }
    }
}
