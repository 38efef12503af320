//! The interaction loop.
//!
//! `galaxy_core` has no I/O of its own: [`galaxy_step`] is the pure,
//! single-step `galaxy(state, event) -> (flag, state', data)` relation, and
//! [`interact`] is the loop around it that keeps stepping while `flag == 1`,
//! asking an [`AlienProxy`] to turn the outgoing `data` into the next
//! `event` each time. The loop is written as a plain `loop {}` rather than
//! by self-recursion: a deeply recursive implementation of this loop blows
//! the native call stack long before a real interaction session ends.

use crate::bridge::{self, BridgeError};
use crate::eval::Evaluator;
use crate::node::Node;
use crate::value::Value;
use thiserror::Error;

/// Sends a request produced by the interaction loop to whatever stands in
/// for the alien proxy, and returns the event it replies with.
///
/// Implemented outside `galaxy_core` (see `galaxy_transport`), so that this
/// crate stays free of any actual transport dependency.
pub trait AlienProxy {
    fn send(&mut self, request: &Value) -> Result<Value, String>;
}

/// An [`AlienProxy`] that never round-trips: useful for tests and for
/// programs whose `galaxy` function never sets `flag = 1`.
pub struct NullProxy;

impl AlienProxy for NullProxy {
    fn send(&mut self, _request: &Value) -> Result<Value, String> {
        Err("NullProxy cannot send: the interaction requested an alien round-trip".to_string())
    }
}

#[derive(Debug, Error)]
pub enum InteractError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("galaxy did not return a 3-element list (flag, state, data): {found}")]
    MalformedResult { found: String },
    #[error("alien proxy error: {0}")]
    Transport(String),
}

/// The result of a complete `interact` call: the final `flag = 0` state and
/// the data it produced (typically a list of rendering commands for the
/// caller to draw).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractOutcome {
    pub state: Value,
    pub data: Value,
}

/// One pure evaluation of `galaxy(state, event)`, with no I/O performed.
pub fn galaxy_step(
    ev: &mut Evaluator,
    galaxy: &Node,
    state: &Value,
    event: &Value,
) -> Result<(i64, Value, Value), InteractError> {
    let state_node = bridge::from_value(state);
    let event_node = bridge::from_value(event);
    let applied = crate::node::ap(crate::node::ap(galaxy.clone(), state_node), event_node);
    let result = bridge::to_value(ev, &applied)?;

    let items = result.to_list().ok_or_else(|| InteractError::MalformedResult {
        found: format!("{result}"),
    })?;
    let [flag_v, state_v, data_v] = <[Value; 3]>::try_from(items).map_err(|items| {
        InteractError::MalformedResult {
            found: format!("list of length {}", items.len()),
        }
    })?;
    let flag = match flag_v {
        Value::Int(n) => n,
        other => {
            return Err(InteractError::MalformedResult {
                found: format!("flag {other}"),
            })
        }
    };
    Ok((flag, state_v, data_v))
}

/// Drive `galaxy` from `state` with `initial_event` until it settles
/// (`flag == 0`), sending every intermediate `data` payload to `proxy` and
/// feeding its reply back in as the next event. `on_step` is called with
/// every `(state, data)` pair the loop yields, including the final one, so
/// a caller can report progress without needing its own copy of the loop.
pub fn interact(
    ev: &mut Evaluator,
    galaxy: &Node,
    mut state: Value,
    mut event: Value,
    proxy: &mut impl AlienProxy,
    mut on_step: impl FnMut(&Value, &Value),
) -> Result<InteractOutcome, InteractError> {
    loop {
        let (flag, new_state, data) = galaxy_step(ev, galaxy, &state, &event)?;
        state = new_state;
        log::debug!("flag={flag}");
        on_step(&state, &data);
        if flag == 0 {
            return Ok(InteractOutcome { state, data });
        }
        event = proxy.send(&data).map_err(InteractError::Transport)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// `galaxy = ap t ap t RESULT`: `t` ignores its second argument (`t y x
    /// = y`), so applying this twice (to `state`, then to `event`) ignores
    /// both and always yields the constant list `[0, 99, nil]`.
    const IGNORES_BOTH_ARGS: &str = "\
galaxy = ap t ap t ap ap cons 0 ap ap cons 99 nil
";

    /// `galaxy = B (B (cons 0) cons) cons`, i.e. `galaxy s e = cons 0 (cons
    /// s e)`: a genuine two-argument function built from `b`, threading
    /// both `state` and `event` into the output list.
    const THREADS_STATE_AND_EVENT: &str = "\
galaxy = ap ap b ap b ap cons 0 cons
";

    /// `galaxy = ap t ((isnil ev) Y X)` where `Y = [0, 5, 0]` and
    /// `X = [1, 5, 1]`: ignores `state`, and on `event` selects the
    /// terminal branch when `event` is `nil` and the continuation branch
    /// otherwise. `isnil ev` is abstracted over `ev` as `B isnil I`, and the
    /// two-armed selection as `C (C (B isnil I) Y) X`, so that applying the
    /// whole term to `ev` yields `(isnil ev) Y X`.
    const ISNIL_DISPATCH: &str = "\
galaxy = ap t ap ap c ap ap c ap ap b isnil i ap ap cons 0 ap ap cons 5 0 ap ap cons 1 ap ap cons 5 1
";

    #[test]
    fn test_galaxy_step_ignores_both_arguments() {
        let scope = parse(IGNORES_BOTH_ARGS).unwrap();
        let mut ev = Evaluator::new(&scope);
        let (flag, new_state, data) = galaxy_step(
            &mut ev,
            &scope["galaxy"],
            &Value::from_list(vec![Value::Int(1), Value::Int(2)]),
            &Value::Int(123),
        )
        .unwrap();
        assert_eq!(flag, 0);
        assert_eq!(new_state, Value::Int(99));
        assert_eq!(data, Value::Nil);
    }

    #[test]
    fn test_interact_stops_at_flag_zero_without_touching_proxy() {
        let scope = parse(IGNORES_BOTH_ARGS).unwrap();
        let mut ev = Evaluator::new(&scope);
        let mut proxy = NullProxy;
        let outcome = interact(
            &mut ev,
            &scope["galaxy"],
            Value::Nil,
            Value::Int(7),
            &mut proxy,
            |_, _| {},
        )
        .unwrap();
        assert_eq!(outcome.state, Value::Int(99));
        assert_eq!(outcome.data, Value::Nil);
    }

    #[test]
    fn test_galaxy_step_threads_state_and_event_into_data() {
        let scope = parse(THREADS_STATE_AND_EVENT).unwrap();
        let mut ev = Evaluator::new(&scope);
        let (flag, state, event) = galaxy_step(
            &mut ev,
            &scope["galaxy"],
            &Value::Int(5),
            &Value::Int(7),
        )
        .unwrap();
        assert_eq!(flag, 0);
        assert_eq!(state, Value::Int(5));
        assert_eq!(event, Value::Int(7));
    }

    #[test]
    fn test_interact_round_trips_through_proxy() {
        let scope = parse(ISNIL_DISPATCH).unwrap();
        let mut ev = Evaluator::new(&scope);

        struct StopNextTime;
        impl AlienProxy for StopNextTime {
            fn send(&mut self, request: &Value) -> Result<Value, String> {
                assert_eq!(*request, Value::Int(1));
                Ok(Value::Nil)
            }
        }
        let mut proxy = StopNextTime;
        let mut steps = Vec::new();
        let outcome = interact(
            &mut ev,
            &scope["galaxy"],
            Value::Nil,
            Value::pair(Value::Int(0), Value::Nil),
            &mut proxy,
            |state, data| steps.push((state.clone(), data.clone())),
        )
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(outcome.state, Value::Int(5));
        assert_eq!(outcome.data, Value::Int(0));
    }

    #[test]
    fn test_null_proxy_rejects_any_send() {
        let mut proxy = NullProxy;
        assert!(proxy.send(&Value::Nil).is_err());
    }
}
