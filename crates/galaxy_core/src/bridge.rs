//! Conversion between expression graph [`Node`]s and fully forced
//! [`Value`]s.
//!
//! `to_value` walks the `cdr` spine of a pair iteratively so that decoding
//! a long list (as produced by, say, a `draw` command list from the
//! interaction loop) doesn't grow the native call stack with list length.
//! `from_value` goes the other way, building an unevaluated `cons` spine a
//! host value can be encoded from.

use crate::eval::{EvalError, Evaluator};
use crate::node::{self, Atom, Node, Prim, Shape};
use crate::value::Value;
use thiserror::Error;

/// A node was forced to weak-head normal form but didn't describe a value
/// (an unsaturated primitive, a bare `t`/`f`, and so on).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("not a value: {found}")]
    NotAValue { found: String },
}

/// Force `node` and every cell reachable along its `cdr` spine, producing
/// the [`Value`] it denotes.
pub fn to_value(ev: &mut Evaluator, node: &Node) -> Result<Value, BridgeError> {
    let mut cars = Vec::new();
    let mut current = node.clone();
    let tail = loop {
        let whnf = ev.eval(&current)?;
        match &whnf.shape {
            Shape::Atom(Atom::Int(n)) => break Value::Int(*n),
            Shape::Atom(Atom::Prim(Prim::Nil)) => break Value::Nil,
            Shape::Ap(..) => {
                let (car, cdr) = as_pair(&whnf)?;
                cars.push(to_value(ev, &car)?);
                current = cdr;
            }
            _ => {
                return Err(BridgeError::NotAValue {
                    found: format!("{whnf}"),
                });
            }
        }
    };
    let mut v = tail;
    for car in cars.into_iter().rev() {
        v = Value::pair(car, v);
    }
    Ok(v)
}

/// Split a forced pair node (`ap (ap cons a) b`) into its two cells.
fn as_pair(whnf: &Node) -> Result<(Node, Node), BridgeError> {
    let not_a_value = || BridgeError::NotAValue {
        found: format!("{whnf}"),
    };
    match &whnf.shape {
        Shape::Ap(fun, b) => match &fun.shape {
            Shape::Ap(fun2, a) => match &fun2.shape {
                Shape::Atom(Atom::Prim(Prim::Cons)) => Ok((a.clone(), b.clone())),
                _ => Err(not_a_value()),
            },
            _ => Err(not_a_value()),
        },
        _ => Err(not_a_value()),
    }
}

/// Build an unevaluated expression graph denoting `value`.
pub fn from_value(value: &Value) -> Node {
    match value {
        Value::Int(n) => node::int(*n),
        Value::Nil => node::nil(),
        Value::Pair(a, b) => node::cons(from_value(a), from_value(b)),
    }
}
