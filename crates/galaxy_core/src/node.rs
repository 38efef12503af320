//! The expression node shape shared by every piece of `galaxy_core`: an
//! immutable-shape graph of [`Ap`](Shape::Ap) (application) and
//! [`Atom`](Shape::Atom) nodes, with a single-assignment memo slot per node.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A node in the expression graph.
///
/// Cloning a `Node` is cheap (it's a refcount bump) and is how the
/// evaluator shares sub-expressions between rewrite products — most
/// visibly in the `s` combinator, which must share its `x` argument rather
/// than duplicate it.
pub type Node = Rc<NodeData>;

/// The data behind a [`Node`].
pub struct NodeData {
    pub shape: Shape,
    /// Single-assignment memo cell: once `Some`, never overwritten.
    evaluated: RefCell<Option<Node>>,
}

/// The two node shapes a `galaxy` expression graph is built from.
pub enum Shape {
    Atom(Atom),
    Ap(Node, Node),
}

/// An atomic leaf: a primitive name, a user-defined name, or an integer
/// literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Atom {
    Int(i64),
    Prim(Prim),
    Name(String),
}

/// The 18 combinator-calculus primitives, grouped by arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prim {
    // Nullary-as-value.
    Nil,
    T,
    F,
    // Unary.
    Neg,
    Inc,
    Dec,
    I,
    IsNil,
    Car,
    Cdr,
    // Binary.
    Add,
    Mul,
    Div,
    Eq,
    Lt,
    Cons,
    // Ternary.
    S,
    C,
    B,
    If0,
}

impl Prim {
    /// The token spelling used in program source, and by [`std::str::FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Prim::Nil => "nil",
            Prim::T => "t",
            Prim::F => "f",
            Prim::Neg => "neg",
            Prim::Inc => "inc",
            Prim::Dec => "dec",
            Prim::I => "i",
            Prim::IsNil => "isnil",
            Prim::Car => "car",
            Prim::Cdr => "cdr",
            Prim::Add => "add",
            Prim::Mul => "mul",
            Prim::Div => "div",
            Prim::Eq => "eq",
            Prim::Lt => "lt",
            Prim::Cons => "cons",
            Prim::S => "s",
            Prim::C => "c",
            Prim::B => "b",
            Prim::If0 => "if0",
        }
    }

    /// Parse a primitive from its token spelling, if `s` names one.
    pub fn parse(s: &str) -> Option<Prim> {
        Some(match s {
            "nil" => Prim::Nil,
            "t" => Prim::T,
            "f" => Prim::F,
            "neg" => Prim::Neg,
            "inc" => Prim::Inc,
            "dec" => Prim::Dec,
            "i" => Prim::I,
            "isnil" => Prim::IsNil,
            "car" => Prim::Car,
            "cdr" => Prim::Cdr,
            "add" => Prim::Add,
            "mul" => Prim::Mul,
            "div" => Prim::Div,
            "eq" => Prim::Eq,
            "lt" => Prim::Lt,
            "cons" => Prim::Cons,
            "s" => Prim::S,
            "c" => Prim::C,
            "b" => Prim::B,
            "if0" => Prim::If0,
            _ => return None,
        })
    }
}

impl NodeData {
    fn new(shape: Shape) -> Node {
        Rc::new(NodeData {
            shape,
            evaluated: RefCell::new(None),
        })
    }

    /// The memoized weak-head normal form of this node, if it has already
    /// been computed.
    pub fn memo(&self) -> Option<Node> {
        self.evaluated.borrow().clone()
    }

    /// Record the weak-head normal form of this node.
    ///
    /// The memo slot is single-assignment: calling this twice on the same
    /// node is a bug in the evaluator, not a recoverable condition, so it
    /// panics rather than silently keeping the first value.
    pub fn set_memo(&self, result: Node) {
        let mut slot = self.evaluated.borrow_mut();
        assert!(slot.is_none(), "memo slot written twice");
        *slot = Some(result);
    }
}

/// Construct an integer literal node.
pub fn int(n: i64) -> Node {
    NodeData::new(Shape::Atom(Atom::Int(n)))
}

/// Construct a primitive node.
pub fn prim(p: Prim) -> Node {
    NodeData::new(Shape::Atom(Atom::Prim(p)))
}

/// Construct a reference to a user-defined name.
pub fn name(s: impl Into<String>) -> Node {
    NodeData::new(Shape::Atom(Atom::Name(s.into())))
}

/// Construct an application node `Ap(fun, arg)`.
pub fn ap(fun: Node, arg: Node) -> Node {
    NodeData::new(Shape::Ap(fun, arg))
}

/// `nil`, `t`, `f` shorthand, used throughout the evaluator and bridge.
pub fn nil() -> Node {
    prim(Prim::Nil)
}
pub fn t() -> Node {
    prim(Prim::T)
}
pub fn f() -> Node {
    prim(Prim::F)
}

/// Build `cons a b` as an unevaluated application spine, for callers that
/// want a list-shaped node without going through the evaluator (the list
/// bridge's `from_value`, mainly).
pub fn cons(a: Node, b: Node) -> Node {
    ap(ap(prim(Prim::Cons), a), b)
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Atom(a) => write!(f, "{a:?}"),
            Shape::Ap(..) => write!(f, "Ap(..)"),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Atom(Atom::Int(n)) => write!(f, "{n}"),
            Shape::Atom(Atom::Prim(p)) => write!(f, "{}", p.name()),
            Shape::Atom(Atom::Name(n)) => write!(f, "{n}"),
            Shape::Ap(fun, arg) => write!(f, "(ap {fun} {arg})"),
        }
    }
}

#[test]
fn test_prim_roundtrip() {
    for p in [
        Prim::Nil,
        Prim::T,
        Prim::F,
        Prim::Neg,
        Prim::Inc,
        Prim::Dec,
        Prim::I,
        Prim::IsNil,
        Prim::Car,
        Prim::Cdr,
        Prim::Add,
        Prim::Mul,
        Prim::Div,
        Prim::Eq,
        Prim::Lt,
        Prim::Cons,
        Prim::S,
        Prim::C,
        Prim::B,
        Prim::If0,
    ] {
        assert_eq!(Prim::parse(p.name()), Some(p));
    }
    assert_eq!(Prim::parse("galaxy"), None);
}

#[test]
fn test_memo_slot_single_assignment() {
    let n = int(1);
    n.set_memo(int(1));
    assert!(n.memo().is_some());
}

#[test]
#[should_panic(expected = "memo slot written twice")]
fn test_memo_slot_rejects_overwrite() {
    let n = int(1);
    n.set_memo(int(1));
    n.set_memo(int(2));
}
