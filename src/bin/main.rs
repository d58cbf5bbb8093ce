extern crate podbot;

use std::io;

use anyhow::{Context, Result};
use podbot::{
    config::{init_tracing, Config},
    protocol::{write_decisions, TokenReader},
    strategy::Strategy,
    world::World,
};

const PODS_PER_TEAM: usize = 2;

fn main() -> Result<()> {
    init_tracing("warn");

    let config = Config::from_env()?;
    let mut strategy = Strategy::new(config);

    let mut reader = TokenReader::new(io::stdin().lock());
    let course = reader.read_course().context("reading course setup")?;
    let checkpoint_count = course.checkpoint_count();
    let mut world = World::new(course, PODS_PER_TEAM);

    let mut out = io::stdout().lock();

    // game loop
    while let Some(turn) = reader
        .read_turn(PODS_PER_TEAM, checkpoint_count)
        .with_context(|| format!("reading turn {}", world.turn + 1))?
    {
        world.apply(&turn);
        let decisions = strategy.play(&mut world);
        write_decisions(&mut out, &decisions).context("writing decisions")?;
    }

    Ok(())
}
