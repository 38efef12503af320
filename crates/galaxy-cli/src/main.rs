//! `galaxy`: run a program's interaction loop for one event, or encode and
//! decode values by hand. See `cli.rs` for the argument surface.

mod cli;
mod error;
mod value_syntax;

use clap::Parser;
use cli::{Cli, Command};
use error::CliError;
use galaxy_core::{demodulate, interact, modulate, parse, Evaluator, Value};
use galaxy_host::{to_layers, Renderer, TextRenderer};
use galaxy_transport::{HttpTransport, NullTransport};
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    match Cli::parse().command {
        Command::Run {
            program,
            base_url,
            api_key,
            state,
            event,
        } => run_program(program, base_url, api_key, state, event),
        Command::Modulate { value } => {
            let v = value_syntax::parse_value(&value)?;
            println!("{}", modulate(&v));
            Ok(())
        }
        Command::Demodulate { bits } => {
            let v = demodulate(&bits)?;
            println!("{v}");
            Ok(())
        }
    }
}

fn run_program(
    program: PathBuf,
    base_url: Option<String>,
    api_key: Option<String>,
    state: Option<String>,
    event: Option<String>,
) -> Result<(), CliError> {
    let source = fs::read_to_string(&program).map_err(|source| CliError::ReadProgram {
        path: program.display().to_string(),
        source,
    })?;
    let scope = parse(&source)?;
    let galaxy = scope
        .get("galaxy")
        .ok_or_else(|| CliError::MissingGalaxyDefinition {
            path: program.display().to_string(),
        })?;

    let initial_state = demodulate(&state.unwrap_or_else(|| "00".to_string()))?;
    let initial_event = match event {
        Some(e) => value_syntax::parse_value(&e)?,
        None => Value::pair(Value::Int(0), Value::Int(0)),
    };

    let base_url = base_url.or_else(|| std::env::var("GALAXY_API_URL").ok());
    let api_key = api_key.or_else(|| std::env::var("GALAXY_API_KEY").ok());

    let on_step = |state: &Value, data: &Value| {
        println!("state: {state}");
        println!("data: {data}");
    };

    let mut ev = Evaluator::new(&scope);
    let outcome = match base_url {
        Some(url) => {
            log::info!("contacting alien proxy at {url}");
            let mut transport = HttpTransport::new(url, api_key);
            interact(
                &mut ev,
                galaxy,
                initial_state,
                initial_event,
                &mut transport,
                on_step,
            )?
        }
        None => {
            log::info!("no base URL configured; the alien proxy will not be contacted");
            let mut transport = NullTransport;
            interact(
                &mut ev,
                galaxy,
                initial_state,
                initial_event,
                &mut transport,
                on_step,
            )?
        }
    };

    log::debug!("evaluator forced {} nodes", ev.stats.forced);
    println!("final state (modulated): {}", modulate(&outcome.state));

    let layers = to_layers(&outcome.data)?;
    TextRenderer.render(&layers);

    Ok(())
}
