//! The CLI's top-level error type, composing each layer's own error via
//! `#[from]` in the idiom `galaxy_core::eval::EvalError` etc. are written
//! in.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read program {path}: {source}")]
    ReadProgram {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] galaxy_core::ParseError),
    #[error(transparent)]
    Interact(#[from] galaxy_core::InteractError),
    #[error(transparent)]
    Codec(#[from] galaxy_core::CodecError),
    #[error(transparent)]
    ValueSyntax(#[from] crate::value_syntax::ValueSyntaxError),
    #[error(transparent)]
    Render(#[from] galaxy_host::RenderError),
    #[error("program {path} has no `galaxy` definition")]
    MissingGalaxyDefinition { path: String },
}
