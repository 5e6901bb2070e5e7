use std::fs;

use serde_json::Value;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::shell_context::ShellContext;
use crate::core::services::{SortKey, SortService};
use crate::ingest::Provider;

use super::joined;

const MAX_REPORTED_ISSUES: usize = 10;

pub(super) fn cmd_ingest(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [provider, path] = args else {
        let providers: Vec<&str> = Provider::all().iter().map(Provider::key).collect();
        return Err(CommandError::InvalidArguments(format!(
            "usage: ingest <{}> <rows.json>",
            providers.join("|")
        )));
    };
    let data = fs::read_to_string(path)?;
    let rows = match serde_json::from_str::<Value>(&data)? {
        Value::Array(rows) => rows,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "`{path}` must contain a JSON array of statement rows"
            )))
        }
    };

    let report = ctx.session.ingest(provider, rows)?;
    for issue in report.issues.iter().take(MAX_REPORTED_ISSUES) {
        output::warning(issue);
    }
    if report.issues.len() > MAX_REPORTED_ISSUES {
        output::warning(format!(
            "... and {} more row issue(s)",
            report.issues.len() - MAX_REPORTED_ISSUES
        ));
    }
    output::success(format!(
        "Ingested {} transaction(s) from {} into {} categories.",
        report.transactions.len(),
        report.provider.name(),
        ctx.session.categories().len()
    ));
    print_categories(ctx);
    Ok(())
}

pub(super) fn cmd_categories(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if ctx.session.categories().is_empty() {
        return Err(CommandError::NoStatement);
    }
    print_categories(ctx);
    Ok(())
}

fn print_categories(ctx: &ShellContext) {
    output::section("Categories");
    let active = ctx.session.active_category();
    for row in ctx.session.overview() {
        let marker = if Some(row.name.as_str()) == active { "*" } else { " " };
        output::line(format!(
            "{} {:<28} {:>4} txn  {:>16}  cashback {}",
            marker,
            row.name,
            row.transaction_count,
            ctx.format_amount(row.total),
            ctx.format_amount(row.total_cashback)
        ));
    }
}

pub(super) fn cmd_open(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = joined(args, "open <name>")?;
    ctx.session.open_category(&name)?;
    print_rows(ctx)
}

pub(super) fn cmd_close(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    ctx.session.close_category();
    output::info("Category closed.");
    Ok(())
}

pub(super) fn cmd_show(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_rows(ctx)
}

fn print_rows(ctx: &ShellContext) -> CommandResult {
    let (Some(name), Some(bucket)) = (ctx.session.active_category(), ctx.session.active_bucket())
    else {
        return Err(CommandError::NoCategoryOpen);
    };
    let spec = ctx.session.sort_spec();
    let order = match spec.key {
        Some(key) => format!("sorted by {} {}", key, spec.direction.arrow()),
        None => "statement order".to_string(),
    };
    output::section(format!(
        "{} | {} | cashback {} | {}",
        name,
        ctx.format_amount(bucket.total()),
        ctx.format_amount(bucket.total_cashback()),
        order
    ));
    let status = ctx.session.status_source();
    let selection = ctx.session.selection();
    for (index, txn) in ctx.session.visible_transactions().into_iter().enumerate() {
        let mark = if selection.is_selected(txn.id) { "[x]" } else { "[ ]" };
        output::line(format!(
            "{} {:>3}  {:<19}  {:>14}  {:<30}  {:<20}  {:<8}  {:<10}  {}",
            mark,
            index + 1,
            txn.date.to_string(),
            ctx.format_amount(txn.amount),
            txn.description,
            txn.source_category(),
            txn.card_or_account,
            SortService::display_status(txn, status),
            txn.payment_type
        ));
    }
    if !selection.is_empty() {
        output::info(format!("{} row(s) selected.", selection.len()));
    }
    Ok(())
}

pub(super) fn cmd_sort(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: sort <date|amount|description|category|card|status|paymentType>".into(),
        ));
    };
    let key: SortKey = raw.parse().map_err(CommandError::InvalidArguments)?;
    if ctx.session.active_category().is_none() {
        return Err(CommandError::NoCategoryOpen);
    }
    ctx.session.sort_by(key);
    print_rows(ctx)
}

pub(super) fn cmd_select(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    if ctx.session.active_category().is_none() {
        return Err(CommandError::NoCategoryOpen);
    }
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: select <row> [row...]".into(),
        ));
    }
    let rows = args
        .iter()
        .map(|raw| match raw.parse::<usize>() {
            Ok(row) if row > 0 => Ok(row),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{raw}` is not a row number"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    for row in rows {
        match ctx.session.toggle_row(row - 1) {
            Some(true) => output::info(format!("Row {row} selected.")),
            Some(false) => output::info(format!("Row {row} deselected.")),
            None => output::warning(format!("Row {row} does not exist.")),
        }
    }
    output::info(format!(
        "{} row(s) selected.",
        ctx.session.selection().len()
    ));
    Ok(())
}

pub(super) fn cmd_select_all(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if ctx.session.active_category().is_none() {
        return Err(CommandError::NoCategoryOpen);
    }
    let count = ctx.session.toggle_all();
    output::info(format!("{} row(s) selected.", count));
    Ok(())
}

pub(super) fn cmd_transfer(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    if ctx.session.active_category().is_none() {
        return Err(CommandError::NoCategoryOpen);
    }
    if args.is_empty() {
        output::section("Transfer targets");
        for name in ctx.session.transfer_targets() {
            output::line(format!("  {name}"));
        }
        output::hint("Use `transfer <target>`; a new name creates the category.");
        return Ok(());
    }
    let target = joined(args, "transfer <target>")?;
    let report = ctx.session.transfer_selected(&target)?;
    output::success(format!(
        "Moved {} transaction(s) from `{}` to `{}`.",
        report.moved, report.source, report.target
    ));
    if report.target_created {
        output::info(format!("Category `{}` was created.", report.target));
    }
    if report.source_removed {
        output::info(format!(
            "Category `{}` is now empty and was removed.",
            report.source
        ));
        return Ok(());
    }
    print_rows(ctx)
}

pub(super) fn cmd_add_category(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = joined(args, "add-category <name>")?;
    let name = ctx.session.add_category(&name)?;
    output::success(format!("Category `{}` added.", name));
    Ok(())
}

pub(super) fn cmd_stats(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if ctx.session.categories().is_empty() {
        return Err(CommandError::NoStatement);
    }
    let stats = ctx.session.statistics();
    output::section("Statistics");
    output::line(format!("Income:       {}", ctx.format_amount(stats.income)));
    output::line(format!("Expenses:     {}", ctx.format_amount(stats.expense)));
    output::line(format!("Net:          {}", ctx.format_amount(stats.net())));
    output::line(format!("Cashback:     {}", ctx.format_amount(stats.cashback)));
    output::line(format!("Transactions: {}", stats.transaction_count));
    let excluded = &ctx.config().transfer_categories;
    if !excluded.is_empty() {
        output::hint(format!("Not counted: {}", excluded.join(", ")));
    }
    for warning in ctx.session.warnings() {
        output::warning(warning);
    }
    Ok(())
}
