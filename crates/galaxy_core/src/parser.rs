//! Parses `galaxy` program text into a [`Scope`] of named expression graphs.
//!
//! Program text is one definition per line: `NAME = TOKEN+`. Tokens are
//! whitespace separated and are one of `ap`, a primitive name, a signed
//! decimal integer, or a user-defined name.

use crate::node::{self, Node, Prim};
use std::collections::HashMap;
use thiserror::Error;

/// A read-only mapping from name to its parsed definition.
///
/// Resolving an `Atom(userName)` during evaluation is a single indirection
/// into this table.
pub type Scope = HashMap<String, Node>;

/// A malformed program or token stream, fatal at parse time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A definition line was missing its `=`.
    #[error("line {line}: expected `NAME = TOKEN+`, found {text:?}")]
    MissingEquals { line: usize, text: String },
    /// The token stream after `=` didn't resolve to a single expression
    /// (too many or too few operands for the `ap` tokens present).
    #[error("line {line}: malformed expression (wrong arity of `ap`)")]
    MalformedExpression { line: usize },
    /// A definition line had no body at all (`NAME =` with nothing after).
    #[error("line {line}: definition has no body")]
    EmptyDefinition { line: usize },
}

/// Parse a full program into a [`Scope`].
pub fn parse(source: &str) -> Result<Scope, ParseError> {
    let mut scope = Scope::new();
    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, '=');
        let name = parts
            .next()
            .ok_or_else(|| ParseError::MissingEquals {
                line: line_no,
                text: line.to_string(),
            })?
            .trim();
        let body = parts.next().ok_or_else(|| ParseError::MissingEquals {
            line: line_no,
            text: line.to_string(),
        })?;
        let tokens: Vec<&str> = body.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ParseError::EmptyDefinition { line: line_no });
        }
        let expr = parse_expr(&tokens, line_no)?;
        scope.insert(name.to_string(), expr);
    }
    Ok(scope)
}

/// One slot of the sentinel stack used by [`parse_expr`]: either a fully
/// parsed node, or a pending `ap` marker waiting for its two operands.
enum Slot {
    Pending,
    Node(Node),
}

/// Parse a single prefix-applicative token stream into an expression node.
///
/// Uses a two-deep sentinel stack: push atoms, push a pending marker for
/// `ap`, and collapse `ap X Y` into `Ap(X, Y)` as soon as it appears at the
/// top of the stack.
fn parse_expr(tokens: &[&str], line_no: usize) -> Result<Node, ParseError> {
    let mut stack: Vec<Slot> = Vec::new();
    for tok in tokens {
        if *tok == "ap" {
            stack.push(Slot::Pending);
        } else {
            stack.push(Slot::Node(atom_from_token(tok)));
        }
        collapse(&mut stack);
    }

    match stack.len() {
        1 => match stack.pop().unwrap() {
            Slot::Node(n) => Ok(n),
            Slot::Pending => Err(ParseError::MalformedExpression { line: line_no }),
        },
        0 => Err(ParseError::EmptyDefinition { line: line_no }),
        _ => Err(ParseError::MalformedExpression { line: line_no }),
    }
}

/// Collapse every `Pending, Node(x), Node(y)` suffix into `Node(Ap(x, y))`,
/// repeatedly — a chain of `ap ap ap ...` can collapse several levels in
/// one call once its operands have all arrived.
fn collapse(stack: &mut Vec<Slot>) {
    loop {
        let len = stack.len();
        if len < 3 {
            return;
        }
        let (is_pending, has_two_nodes) = (
            matches!(stack[len - 3], Slot::Pending),
            matches!(stack[len - 2], Slot::Node(_)) && matches!(stack[len - 1], Slot::Node(_)),
        );
        if !(is_pending && has_two_nodes) {
            return;
        }
        let y = match stack.pop().unwrap() {
            Slot::Node(n) => n,
            Slot::Pending => unreachable!(),
        };
        let x = match stack.pop().unwrap() {
            Slot::Node(n) => n,
            Slot::Pending => unreachable!(),
        };
        stack.pop(); // the `Pending` marker.
        stack.push(Slot::Node(node::ap(x, y)));
    }
}

fn atom_from_token(tok: &str) -> Node {
    if let Some(p) = Prim::parse(tok) {
        return node::prim(p);
    }
    if let Ok(n) = tok.parse::<i64>() {
        return node::int(n);
    }
    node::name(tok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Shape;

    #[test]
    fn test_parse_simple_add() {
        let scope = parse("main = ap ap add 3 4").unwrap();
        let main = &scope["main"];
        match &main.shape {
            Shape::Ap(f, arg2) => {
                assert_eq!(format!("{arg2}"), "4");
                match &f.shape {
                    Shape::Ap(f2, arg1) => {
                        assert_eq!(format!("{arg1}"), "3");
                        assert_eq!(format!("{f2}"), "add");
                    }
                    _ => panic!("expected nested ap"),
                }
            }
            _ => panic!("expected ap"),
        }
    }

    #[test]
    fn test_parse_negative_literal() {
        let scope = parse("main = ap neg 5").unwrap();
        assert!(scope.contains_key("main"));
    }

    #[test]
    fn test_parse_blank_lines_and_user_names() {
        let scope = parse("\nid = i\n\nmain = ap id 1\n").unwrap();
        assert!(scope.contains_key("id"));
        assert!(scope.contains_key("main"));
    }

    #[test]
    fn test_parse_numbered_function_name() {
        let scope = parse(":1029 = ap i 1\nmain = :1029").unwrap();
        assert!(scope.contains_key(":1029"));
    }

    #[test]
    fn test_parse_missing_equals_is_error() {
        let err = parse("main ap add 3 4").unwrap_err();
        assert!(matches!(err, ParseError::MissingEquals { .. }));
    }

    #[test]
    fn test_parse_wrong_ap_arity_is_error() {
        let err = parse("main = ap ap add 3").unwrap_err();
        assert!(matches!(err, ParseError::MalformedExpression { .. }));
    }

    #[test]
    fn test_parse_empty_definition_is_error() {
        let err = parse("main =").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDefinition { .. }));
    }
}
