use std::path::PathBuf;

use chrono::Local;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::shell_context::ShellContext;
use crate::storage::export_file_name;

use super::joined;

pub(super) fn cmd_export(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args {
        [] => PathBuf::from(export_file_name(Local::now().date_naive())),
        [path] => PathBuf::from(path),
        _ => return Err(CommandError::InvalidArguments("usage: export [path]".into())),
    };
    ctx.session.export_to_path(&path)?;
    output::success(format!("Exported to {}", path.display()));
    Ok(())
}

pub(super) fn cmd_import(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(CommandError::InvalidArguments("usage: import <path>".into()));
    };
    let count = ctx.session.import_from_path(&PathBuf::from(path))?;
    output::success(format!(
        "Imported {} transaction(s) in {} categories.",
        count,
        ctx.session.categories().len()
    ));
    Ok(())
}

pub(super) fn cmd_save(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = joined(args, "save <name>")?;
    let path = ctx.session.save(&name)?;
    output::success(format!("Saved `{}` to {}", name, path.display()));
    Ok(())
}

pub(super) fn cmd_load(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = joined(args, "load <name>")?;
    let count = ctx.session.load(&name)?;
    output::success(format!("Loaded `{}` ({} transaction(s)).", name, count));
    Ok(())
}

pub(super) fn cmd_backup(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let note = (!note.trim().is_empty()).then_some(note.as_str());
    let path = ctx.session.backup(note)?;
    output::success(format!("Backup written to {}", path.display()));
    Ok(())
}

pub(super) fn cmd_backups(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = ctx.session.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    output::section("Backups (newest first)");
    for (index, name) in backups.iter().enumerate() {
        output::line(format!("{:>3}. {}", index + 1, name));
    }
    Ok(())
}

pub(super) fn cmd_restore(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <backup|number>".into(),
        ));
    };
    // a number refers to the `backups` listing
    let backup = match raw.parse::<usize>() {
        Ok(index) if index > 0 => ctx
            .session
            .list_backups()?
            .into_iter()
            .nth(index - 1)
            .ok_or_else(|| CommandError::InvalidArguments(format!("no backup #{index}")))?,
        _ => raw.to_string(),
    };
    let count = ctx.session.restore(&backup)?;
    output::success(format!("Restored {} ({} transaction(s)).", backup, count));
    Ok(())
}

pub(super) fn cmd_reset(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ctx.session.reset();
    output::success("All data cleared.");
    Ok(())
}
