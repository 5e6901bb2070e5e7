mod snapshot;
mod statement;
mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        system::cmd_help,
    ));
    registry.register(CommandEntry::new(
        "ingest",
        "Load a bank statement exported as a JSON array of rows",
        "ingest <tinkoff|sberbank> <rows.json>",
        statement::cmd_ingest,
    ));
    registry.register(CommandEntry::new(
        "categories",
        "List categories with their totals",
        "categories",
        statement::cmd_categories,
    ));
    registry.register(CommandEntry::new(
        "open",
        "Open a category to view and select its transactions",
        "open <name>",
        statement::cmd_open,
    ));
    registry.register(CommandEntry::new(
        "close",
        "Close the open category",
        "close",
        statement::cmd_close,
    ));
    registry.register(CommandEntry::new(
        "show",
        "Show the transactions of the open category",
        "show",
        statement::cmd_show,
    ));
    registry.register(CommandEntry::new(
        "sort",
        "Sort the open category; repeating a key flips the direction",
        "sort <date|amount|description|category|card|status|paymentType>",
        statement::cmd_sort,
    ));
    registry.register(CommandEntry::new(
        "select",
        "Toggle rows (numbers as shown by `show`)",
        "select <row> [row...]",
        statement::cmd_select,
    ));
    registry.register(CommandEntry::new(
        "select-all",
        "Select every row of the open category, or clear the selection",
        "select-all",
        statement::cmd_select_all,
    ));
    registry.register(CommandEntry::new(
        "transfer",
        "Move the selected rows into another category; without a target, list the targets",
        "transfer [target]",
        statement::cmd_transfer,
    ));
    registry.register(CommandEntry::new(
        "add-category",
        "Create an empty category",
        "add-category <name>",
        statement::cmd_add_category,
    ));
    registry.register(CommandEntry::new(
        "stats",
        "Show income, expenses and cashback",
        "stats",
        statement::cmd_stats,
    ));
    registry.register(CommandEntry::new(
        "export",
        "Write the categories to a JSON file",
        "export [path]",
        snapshot::cmd_export,
    ));
    registry.register(CommandEntry::new(
        "import",
        "Replace the categories with an exported JSON file",
        "import <path>",
        snapshot::cmd_import,
    ));
    registry.register(CommandEntry::new(
        "save",
        "Save the categories as a named snapshot",
        "save <name>",
        snapshot::cmd_save,
    ));
    registry.register(CommandEntry::new(
        "load",
        "Load a named snapshot",
        "load <name>",
        snapshot::cmd_load,
    ));
    registry.register(CommandEntry::new(
        "backup",
        "Back up the current named snapshot",
        "backup [note]",
        snapshot::cmd_backup,
    ));
    registry.register(CommandEntry::new(
        "backups",
        "List backups of the current named snapshot",
        "backups",
        snapshot::cmd_backups,
    ));
    registry.register(CommandEntry::new(
        "restore",
        "Restore the current named snapshot from a backup",
        "restore <backup>",
        snapshot::cmd_restore,
    ));
    registry.register(CommandEntry::new(
        "reset",
        "Discard all loaded data",
        "reset",
        snapshot::cmd_reset,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show the active configuration",
        "config",
        system::cmd_config,
    ));
    registry.register(CommandEntry::new(
        "mapping",
        "Show or change the category mapping used by `ingest`",
        "mapping [show|defaults|clear]",
        system::cmd_mapping,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        system::cmd_version,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        system::cmd_exit,
    ));
    registry.alias("quit", "exit");
}

/// Joins the remaining words so unquoted multi-word names work.
fn joined(args: &[&str], usage: &str) -> Result<String, CommandError> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(name.trim().to_string())
    }
}
