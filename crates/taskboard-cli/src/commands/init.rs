use anyhow::{Context, Result};
use std::env;
use taskboard_store::Repository;

pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    Repository::init(&cwd).context("failed to initialize board")?;
    println!("Initialized empty task board in {}", cwd.join(".taskboard").display());
    Ok(())
}
