extern crate podbot;

use std::io;

use anyhow::{Context, Result};
use podbot::{
    config::init_tracing,
    legacy::SimplePilot,
    protocol::{write_decisions, TokenReader},
};

fn main() -> Result<()> {
    init_tracing("warn");

    let mut reader = TokenReader::new(io::stdin().lock());
    let mut out = io::stdout().lock();
    let mut pilot = SimplePilot::new();

    // game loop
    while let Some(turn) = reader.read_simple_turn().context("reading turn")? {
        let decision = pilot.decide(&turn);
        write_decisions(&mut out, &[decision]).context("writing decision")?;
    }

    Ok(())
}
