//! Lazy, memoized reduction of `galaxy` expression graphs to weak-head
//! normal form.
//!
//! The public entry point is [`Evaluator::eval`]. It loops applying
//! [`Evaluator::step`] (one reduction of the primitive rewrite rules) until
//! a fixed point is reached, then memoizes the result on the *original*
//! node passed in — never on the intermediate rewrite products produced
//! along the way, except for `cons` pairs, which self-memoize on
//! construction.

use crate::node::{self, Atom, Node, Prim, Shape};
use crate::parser::Scope;
use std::rc::Rc;
use thiserror::Error;

/// Evaluation failed while forcing a value to weak-head normal form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// An `Atom(userName)` had no binding in scope.
    #[error("unbound name: {0}")]
    UnboundName(String),
    /// A primitive demanded a number but found something else (a pair,
    /// `nil`, or an unsaturated primitive).
    #[error("expected a number, found {found}")]
    NotANumber { found: String },
    /// `div` with a zero divisor.
    #[error("division by zero")]
    DivByZero,
}

/// Counts primitive rewrite firings, so the memoization property
/// (evaluating the same node twice visits the underlying rewrite rule at
/// most once) can be asserted on in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvalStats {
    /// Number of nodes that were actually forced through the reduction
    /// loop (as opposed to being served directly from their memo slot).
    pub forced: u64,
}

/// Drives reduction of expression graphs within a fixed [`Scope`].
pub struct Evaluator<'a> {
    scope: &'a Scope,
    pub stats: EvalStats,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a Scope) -> Self {
        Evaluator {
            scope,
            stats: EvalStats::default(),
        }
    }

    /// Reduce `node` to weak-head normal form.
    ///
    /// Repeatedly applies [`Self::step`] until it stops making progress,
    /// then memoizes the fixed point on `node` itself.
    pub fn eval(&mut self, node: &Node) -> Result<Node, EvalError> {
        if let Some(memo) = node.memo() {
            return Ok(memo);
        }
        self.stats.forced += 1;

        let mut current = node.clone();
        loop {
            let next = self.step(&current)?;
            if Rc::ptr_eq(&next, &current) {
                node.set_memo(current.clone());
                return Ok(current);
            }
            current = next;
        }
    }

    /// One reduction step. Returns `current` unchanged if no rewrite rule
    /// applies yet (not enough arguments have arrived).
    fn step(&mut self, current: &Node) -> Result<Node, EvalError> {
        if let Some(memo) = current.memo() {
            return Ok(memo);
        }
        match &current.shape {
            Shape::Atom(Atom::Name(name)) => self
                .scope
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundName(name.clone())),
            Shape::Ap(fun_expr, x) => {
                let fun_val = self.eval(fun_expr)?;
                match &fun_val.shape {
                    Shape::Atom(Atom::Prim(p)) => {
                        log::trace!("rewrite: {p:?} x1");
                        self.unary(*p, x, current)
                    }
                    Shape::Ap(fun2_expr, y) => {
                        let fun2_val = self.eval(fun2_expr)?;
                        match &fun2_val.shape {
                            Shape::Atom(Atom::Prim(p2)) => {
                                log::trace!("rewrite: {p2:?} x2");
                                self.binary(*p2, y, x, current)
                            }
                            Shape::Ap(fun3_expr, z) => {
                                let fun3_val = self.eval(fun3_expr)?;
                                match &fun3_val.shape {
                                    Shape::Atom(Atom::Prim(p3)) => {
                                        log::trace!("rewrite: {p3:?} x3");
                                        self.ternary(*p3, z, y, x, current)
                                    }
                                    _ => Ok(current.clone()),
                                }
                            }
                            _ => Ok(current.clone()),
                        }
                    }
                    _ => Ok(current.clone()),
                }
            }
            _ => Ok(current.clone()),
        }
    }

    /// Dispatch a primitive applied to a single argument `x`.
    fn unary(&mut self, p: Prim, x: &Node, current: &Node) -> Result<Node, EvalError> {
        Ok(match p {
            Prim::Neg => node::int(-self.as_num(x)?),
            Prim::Inc => node::int(self.as_num(x)? + 1),
            Prim::Dec => node::int(self.as_num(x)? - 1),
            Prim::I => x.clone(),
            Prim::Nil => node::t(),
            Prim::IsNil => node::ap(x.clone(), node::ap(node::t(), node::ap(node::t(), node::f()))),
            Prim::Car => node::ap(x.clone(), node::t()),
            Prim::Cdr => node::ap(x.clone(), node::f()),
            // Not enough arguments yet for a binary/ternary primitive.
            _ => current.clone(),
        })
    }

    /// Dispatch a primitive applied to two arguments: `y` arrived first
    /// (inner), `x` arrived second (outer), matching the `f y x` argument
    /// order used throughout the primitive table.
    fn binary(&mut self, p: Prim, y: &Node, x: &Node, current: &Node) -> Result<Node, EvalError> {
        Ok(match p {
            Prim::T => y.clone(),
            Prim::F => x.clone(),
            Prim::Add => node::int(self.as_num(x)? + self.as_num(y)?),
            Prim::Mul => node::int(self.as_num(x)? * self.as_num(y)?),
            Prim::Div => {
                let divisor = self.as_num(x)?;
                if divisor == 0 {
                    return Err(EvalError::DivByZero);
                }
                // `i64::MIN / -1` overflows `i64` under plain `/`, which
                // panics in debug builds; `wrapping_div` defines this one
                // case to wrap back to `i64::MIN`, matching release-mode
                // behavior instead of panicking on an extreme but valid
                // program input.
                node::int(self.as_num(y)?.wrapping_div(divisor))
            }
            Prim::Lt => {
                if self.as_num(y)? < self.as_num(x)? {
                    node::t()
                } else {
                    node::f()
                }
            }
            Prim::Eq => {
                if self.as_num(x)? == self.as_num(y)? {
                    node::t()
                } else {
                    node::f()
                }
            }
            Prim::Cons => {
                let a = self.eval(y)?;
                let b = self.eval(x)?;
                let pair = node::ap(node::ap(node::prim(Prim::Cons), a), b);
                pair.set_memo(pair.clone());
                pair
            }
            // Not enough arguments yet for a ternary primitive.
            _ => current.clone(),
        })
    }

    /// Dispatch a primitive applied to three arguments `z`, `y`, `x`
    /// (arrival order inner to outer).
    fn ternary(
        &mut self,
        p: Prim,
        z: &Node,
        y: &Node,
        x: &Node,
        current: &Node,
    ) -> Result<Node, EvalError> {
        Ok(match p {
            Prim::S => node::ap(node::ap(z.clone(), x.clone()), node::ap(y.clone(), x.clone())),
            Prim::C => node::ap(node::ap(z.clone(), x.clone()), y.clone()),
            Prim::B => node::ap(z.clone(), node::ap(y.clone(), x.clone())),
            Prim::If0 => {
                if self.as_num(z)? == 0 {
                    y.clone()
                } else {
                    x.clone()
                }
            }
            // A saturated pair (`cons z y`) applied to a selector `x`.
            Prim::Cons => node::ap(node::ap(x.clone(), z.clone()), y.clone()),
            _ => current.clone(),
        })
    }

    /// Force `node` and require the result to be an integer literal.
    fn as_num(&mut self, node: &Node) -> Result<i64, EvalError> {
        let v = self.eval(node)?;
        match &v.shape {
            Shape::Atom(Atom::Int(n)) => Ok(*n),
            _ => Err(EvalError::NotANumber {
                found: format!("{v}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval_main(src: &str) -> Node {
        let scope = parse(src).unwrap();
        let mut ev = Evaluator::new(&scope);
        ev.eval(&scope["main"]).unwrap()
    }

    #[test]
    fn test_add() {
        let v = eval_main("main = ap ap add 3 4");
        assert_eq!(format!("{v}"), "7");
    }

    #[test]
    fn test_s_combinator() {
        // S add inc 1 = add 1 (inc 1) = 1 + 2 = 3
        let v = eval_main("main = ap ap ap s add inc 1");
        assert_eq!(format!("{v}"), "3");
    }

    #[test]
    fn test_if0() {
        let v = eval_main("main = ap ap ap if0 0 42 99");
        assert_eq!(format!("{v}"), "42");

        let v = eval_main("main = ap ap ap if0 1 42 99");
        assert_eq!(format!("{v}"), "99");
    }

    #[test]
    fn test_car_of_cons() {
        let v = eval_main("main = ap car ap ap cons 5 nil");
        assert_eq!(format!("{v}"), "5");
    }

    #[test]
    fn test_cdr_of_cons() {
        let scope = parse("main = ap cdr ap ap cons 5 6").unwrap();
        let mut ev = Evaluator::new(&scope);
        let v = ev.eval(&scope["main"]).unwrap();
        assert_eq!(format!("{v}"), "6");
    }

    #[test]
    fn test_isnil() {
        assert_eq!(format!("{}", eval_main("main = ap isnil nil")), "t");
        assert_eq!(
            format!("{}", eval_main("main = ap isnil ap ap cons 1 nil")),
            "f"
        );
    }

    #[test]
    fn test_identity_combinators() {
        assert_eq!(format!("{}", eval_main("main = ap i 42")), "42");
        assert_eq!(format!("{}", eval_main("main = ap ap t 1 2")), "1");
        assert_eq!(format!("{}", eval_main("main = ap ap f 1 2")), "2");
    }

    #[test]
    fn test_b_and_c_combinators() {
        // B neg neg 5 = neg (neg 5) = 5
        assert_eq!(format!("{}", eval_main("main = ap ap ap b neg neg 5")), "5");
        // C add 1 2 = add 2 1 = 3  (C f y x = f x y, so C add 1 2 = add 2 1)
        assert_eq!(format!("{}", eval_main("main = ap ap ap c add 1 2")), "3");
    }

    #[test]
    fn test_arithmetic_laws() {
        assert_eq!(format!("{}", eval_main("main = ap ap div 7 2")), "3");
        assert_eq!(format!("{}", eval_main("main = ap ap div -7 2")), "-3");
        assert_eq!(format!("{}", eval_main("main = ap inc 5")), "6");
        assert_eq!(format!("{}", eval_main("main = ap dec 5")), "4");
        assert_eq!(format!("{}", eval_main("main = ap neg 5")), "-5");
    }

    #[test]
    fn test_div_by_zero_is_error() {
        let scope = parse("main = ap ap div 5 0").unwrap();
        let mut ev = Evaluator::new(&scope);
        assert_eq!(ev.eval(&scope["main"]), Err(EvalError::DivByZero));
    }

    #[test]
    fn test_div_min_by_neg_one_does_not_panic() {
        let src = format!("main = ap ap div {} -1", i64::MIN);
        let v = eval_main(&src);
        assert_eq!(format!("{v}"), i64::MIN.to_string());
    }

    #[test]
    fn test_unbound_name_is_error() {
        let scope = parse("main = undefined_name").unwrap();
        let mut ev = Evaluator::new(&scope);
        assert_eq!(
            ev.eval(&scope["main"]),
            Err(EvalError::UnboundName("undefined_name".to_string()))
        );
    }

    #[test]
    fn test_memoization_forces_shared_subexpr_once() {
        // `s add inc 1` rewrites to `add 1 (inc 1)`, with the literal `1`
        // Rc-shared into both the `add` and `inc` branches by the `s` arm
        // rather than being a separately parsed/cloned node in each. Nine
        // distinct nodes are ever forced here: `main`, the three partial
        // applications peeled off it, the `s`/`add`/`inc` atoms, and the two
        // rewritten `add 1`/`inc 1` applications, each exactly once,
        // including the shared `1` (forced once, not twice, as it would be
        // if the `s`, `c`, or `b` rewrite arms accidentally duplicated
        // rather than shared their argument).
        let scope = parse("main = ap ap ap s add inc 1").unwrap();
        let mut ev = Evaluator::new(&scope);
        let v = ev.eval(&scope["main"]).unwrap();
        assert_eq!(format!("{v}"), "3");
        assert_eq!(ev.stats.forced, 9);

        // Re-evaluating the now fully-memoized root costs nothing further.
        ev.eval(&scope["main"]).unwrap();
        assert_eq!(ev.stats.forced, 9);
    }
}
