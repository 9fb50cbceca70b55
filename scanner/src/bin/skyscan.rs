use std::env;

use anyhow::{bail, Context, Result};

pub fn main() -> Result<()> {
    env_logger::init();

    // Parse the fixture path from args, like `skyscan -c table.json`.
    let args: Vec<String> = env::args().collect();
    let Some(path) = args
        .iter()
        .position(|arg| arg == "-c")
        .and_then(|index| args.get(index + 1))
    else {
        bail!("usage: skyscan -c <fixture.json>");
    };

    let report = sky_scanner::run(path)?;
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
