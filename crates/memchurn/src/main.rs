//! `memchurn` binary: read an experiment number from stdin, run it, and
//! dump `/proc/self/status`.
//!
//! Blank lines are skipped and text after the number is ignored. Numbers
//! 0 to 7 pick an experiment. Anything else skips straight to the memory
//! report. Set `RUST_LOG=info` to see phase transitions.

use std::io;

use anyhow::Context;
use memchurn::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let selector = read_selector(io::stdin().lock())
        .context("failed to read experiment number from stdin")?;

    let mut session = Session::new(io::stdout().lock());
    session.execute(selector)?;
    Ok(())
}
