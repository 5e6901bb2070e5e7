use std::collections::BTreeMap;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::output;
use crate::cli::shell_context::ShellContext;
use crate::ingest::CategoryMapping;
use crate::utils::build_info;

pub(super) fn cmd_help(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match ctx.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => ctx.suggest_command(name),
        },
        None => help::print_overview(&ctx.registry),
    }
    Ok(())
}

pub(super) fn cmd_config(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let config = ctx.config();
    output::section("Configuration");
    output::line(format!("File:                {}", ctx.config_manager.path().display()));
    output::line(format!("Locale:              {}", config.locale));
    output::line(format!("Currency:            {}", config.currency));
    output::line(format!("Default category:    {}", config.default_category));
    output::line(format!(
        "Transfer categories: {}",
        config.transfer_categories.join(", ")
    ));
    output::line(format!(
        "Category mapping:    {} rule(s)",
        config.category_mapping.len()
    ));
    output::line(format!("Backup retention:    {}", config.backup_retention));
    Ok(())
}

pub(super) fn cmd_mapping(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rules: BTreeMap<String, String> = match args {
        [] | ["show"] => {
            let mapping = &ctx.config().category_mapping;
            if mapping.is_empty() {
                output::info("No category mapping; categories are kept as the bank reports them.");
            }
            for (from, to) in mapping {
                output::line(format!("  {from} -> {to}"));
            }
            return Ok(());
        }
        ["defaults"] => CategoryMapping::budget_defaults().rules().clone(),
        ["clear"] => BTreeMap::new(),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: mapping [show|defaults|clear]".into(),
            ))
        }
    };

    let mut config = ctx.config().clone();
    ctx.config_manager.backup(&config, Some("before mapping change"))?;
    config.category_mapping = rules;
    ctx.config_manager.save(&config)?;
    let count = config.category_mapping.len();
    ctx.session.set_config(config);
    output::success(format!(
        "Category mapping now has {} rule(s); it applies to the next `ingest`.",
        count
    ));
    Ok(())
}

pub(super) fn cmd_version(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::info(meta.summary());
    output::info(format!("rustc: {}", meta.rustc));
    Ok(())
}

pub(super) fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Goodbye.");
    Err(CommandError::ExitRequested)
}
