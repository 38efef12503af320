//! The command-line surface: run a program's interaction loop, or
//! modulate/demodulate a value by hand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "galaxy", version, about = "A lazy combinator interpreter with an alien-proxy interaction loop.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a galaxy program's interaction loop to completion for one event.
    Run {
        /// Path to a galaxy program, in the `NAME = TOKEN+` per-line format.
        #[arg(long)]
        program: PathBuf,

        /// Base URL of the alien proxy. Falls back to `GALAXY_API_URL` if
        /// unset; if neither is set, the proxy is never contacted and the
        /// program must settle with `flag = 0` on its first step.
        #[arg(long)]
        base_url: Option<String>,

        /// API key query parameter sent with every alien-proxy request.
        /// Falls back to `GALAXY_API_KEY` if unset.
        #[arg(long)]
        api_key: Option<String>,

        /// The modulated bit string of the initial state. Defaults to
        /// `nil` (`"00"`) for a program's first run.
        #[arg(long)]
        state: Option<String>,

        /// The event to send, in the small value syntax (e.g. `(0 . 0)`,
        /// `[1, 2, 3]`, `nil`, `42`). Defaults to `(0 . 0)`, the click at
        /// the origin a program's first run is conventionally sent.
        #[arg(long)]
        event: Option<String>,
    },
    /// Encode a value (in the small value syntax) to its modulated bits.
    Modulate { value: String },
    /// Decode a modulated bit string back to a value.
    Demodulate { bits: String },
}
