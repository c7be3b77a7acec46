//! Implementation of the `doclease sweep` command.

use super::CommandContext;
use crate::cli::SweepArgs;
use crate::error::Result;
use crate::sweeper::{Sweeper, sweep_once};
use std::sync::Arc;

pub fn cmd_sweep(ctx: &CommandContext, args: SweepArgs) -> Result<()> {
    let store = ctx.manager.store();
    let clock = ctx.manager.clock();

    if !args.watch {
        let removed = sweep_once(store.as_ref(), clock.as_ref())?;
        println!("Removed {} expired lease(s).", removed);
        return Ok(());
    }

    println!(
        "Sweeping every {}s (Ctrl-C to stop)...",
        ctx.config.sweep_interval_seconds
    );
    let handle = Sweeper::spawn(
        Arc::clone(store),
        Arc::clone(clock),
        ctx.config.sweep_interval(),
    )?;
    handle.join();
    Ok(())
}
