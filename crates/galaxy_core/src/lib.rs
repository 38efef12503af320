//! `galaxy_core`: the parser, lazy combinator evaluator, `modulate`/
//! `demodulate` codec, list bridge, and interaction-loop step for the
//! `galaxy` language. No I/O — see `galaxy_transport` for the network
//! side of the interaction loop and `galaxy-cli` for the binary that wires
//! everything together.

pub mod bridge;
pub mod codec;
pub mod eval;
pub mod interact;
pub mod node;
pub mod parser;
pub mod value;

pub use bridge::{from_value, to_value, BridgeError};
pub use codec::{demodulate, modulate, CodecError};
pub use eval::{EvalError, EvalStats, Evaluator};
pub use interact::{galaxy_step, interact, AlienProxy, InteractError, InteractOutcome, NullProxy};
pub use node::{Node, Prim};
pub use parser::{parse, ParseError, Scope};
pub use value::Value;
