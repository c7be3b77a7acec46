//! Implementation of the `acquire`, `release`, `check` and `list` commands.
//!
//! With `--json` each command prints the body the editor endpoint would
//! return and fails with the matching exit code on a non-200 status.

use super::{CommandContext, resolve_session, response_error};
use crate::api::{self, ApiResponse, FileRequest};
use crate::cli::LeaseArgs;
use crate::error::{LeaseError, Result};
use crate::ids::FileId;
use crate::locks::{AcquireOutcome, ReleaseOutcome};

pub fn cmd_acquire(ctx: &CommandContext, args: LeaseArgs) -> Result<()> {
    let session = resolve_session(args.session)?;

    if ctx.json {
        return emit(api::acquire_lock(
            &ctx.manager,
            &session,
            &FileRequest::new(args.file_id),
        ));
    }

    let file_id = FileId::new(args.file_id)?;
    match ctx.manager.acquire(&file_id, &session)? {
        AcquireOutcome::Acquired(lock) => {
            let now = ctx.manager.clock().now();
            println!("Acquired {}", file_id);
            println!("  Owner:      {}", lock.owner);
            println!(
                "  Expires:    {} ({} left)",
                lock.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
                lock.remaining_string(now)
            );
            Ok(())
        }
        AcquireOutcome::Conflict { owner: Some(owner) } => Err(LeaseError::Conflict(format!(
            "'{}' is locked by session '{}'",
            file_id, owner
        ))),
        AcquireOutcome::Conflict { owner: None } => Err(LeaseError::Conflict(format!(
            "'{}' is locked by another session",
            file_id
        ))),
    }
}

pub fn cmd_release(ctx: &CommandContext, args: LeaseArgs) -> Result<()> {
    let session = resolve_session(args.session)?;

    if ctx.json {
        return emit(api::release_lock(
            &ctx.manager,
            &session,
            &FileRequest::new(args.file_id),
        ));
    }

    let file_id = FileId::new(args.file_id)?;
    match ctx.manager.release(&file_id, &session)? {
        ReleaseOutcome::Released => {
            println!("Released {}", file_id);
            Ok(())
        }
        ReleaseOutcome::AlreadyReleased => {
            println!("No active lease on {} for {}; nothing to release", file_id, session);
            Ok(())
        }
        ReleaseOutcome::NotOwner { owner } => Err(LeaseError::Conflict(format!(
            "'{}' is held by session '{}', not '{}'",
            file_id, owner, session
        ))),
    }
}

pub fn cmd_check(ctx: &CommandContext, args: LeaseArgs) -> Result<()> {
    let session = resolve_session(args.session)?;

    if ctx.json {
        return emit(api::check_lock(
            &ctx.manager,
            &session,
            &FileRequest::new(args.file_id),
        ));
    }

    let file_id = FileId::new(args.file_id)?;
    let status = ctx.manager.check_lock(&file_id, &session)?;
    if !status.is_locked {
        println!("{} is free for {}", file_id, session);
        return Ok(());
    }

    // Checking is informational: a foreign lease is reported, not an error.
    match ctx.manager.inspect(&file_id)? {
        Some(lock) => println!("{} is locked by {}", file_id, lock.owner),
        None => println!("{} is locked", file_id),
    }
    Ok(())
}

pub fn cmd_list(ctx: &CommandContext) -> Result<()> {
    if ctx.json {
        return emit(api::list_locks(&ctx.manager));
    }

    let now = ctx.manager.clock().now();
    let ids = ctx.manager.list_locked()?;

    if ids.is_empty() {
        println!("No active leases.");
        return Ok(());
    }

    println!("Active leases ({}):", ids.len());
    println!();

    for file_id in &ids {
        // A lease listed a moment ago may lapse before we read it back.
        let Some(lock) = ctx.manager.inspect(file_id)? else {
            continue;
        };
        println!("  {}:", file_id);
        println!("    Owner:      {}", lock.owner);
        println!(
            "    Acquired:   {}",
            lock.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("    Remaining:  {}", lock.remaining_string(now));
        println!();
    }

    Ok(())
}

fn emit(response: ApiResponse) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&response.body)
        .map_err(|e| LeaseError::UserError(format!("failed to render response: {}", e)))?;
    println!("{}", rendered);

    if response.is_success() {
        Ok(())
    } else {
        Err(response_error(response.status, &response.body))
    }
}
