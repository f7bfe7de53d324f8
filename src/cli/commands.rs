use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::params::format_parent_field;
use crate::application::{ApplicationError, SelectionParams};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::tree_view::ToTermTree;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{OptionEntry, ReparentVerdict};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current dir", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;

    match command {
        Commands::Config { command } => return _config(command, &settings, &project_dir),
        Commands::Completion { shell } => return _completion(*shell),
        _ => {}
    }

    let catalog_file = cli
        .catalog
        .clone()
        .unwrap_or_else(|| settings.catalog_path(&project_dir));
    debug!("catalog: {}", catalog_file.display());
    let container = ServiceContainer::new(settings, &catalog_file);

    match command {
        Commands::Tree { counts } => _tree(&container, *counts),
        Commands::Descendants { id } => _descendants(&container, id),
        Commands::Ancestors { id } => _ancestors(&container, id),
        Commands::Counts { all } => _counts(&container, *all),
        Commands::Filter {
            subcategory,
            category,
            categories,
            products,
        } => {
            let params = SelectionParams {
                subcategory: subcategory.clone(),
                category: category.clone(),
                categories: categories.clone(),
            };
            _filter(&container, params, *products)
        }
        Commands::Options { exclude, parent } => {
            _options(&container, exclude.as_deref(), parent.as_deref())
        }
        Commands::Validate { id, parent } => _validate(&container, id, parent),
        Commands::Reparent { id, parent } => _reparent(&container, id, parent),
        Commands::Check => _check(&container),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, counts: bool) -> CliResult<()> {
    let forest = container.catalog.tree()?;
    if forest.is_empty() {
        output::warning("catalog has no categories");
        return Ok(());
    }
    let totals = if counts {
        Some(container.catalog.totals()?)
    } else {
        None
    };
    for root in &forest.roots {
        print!("{}", root.to_term_tree(totals.as_ref()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _descendants(container: &ServiceContainer, id: &str) -> CliResult<()> {
    for descendant in container.catalog.descendants(id)? {
        output::info(&descendant);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _ancestors(container: &ServiceContainer, id: &str) -> CliResult<()> {
    for ancestor in container.catalog.ancestors(id)? {
        output::info(&ancestor);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _counts(container: &ServiceContainer, all: bool) -> CliResult<()> {
    if !all {
        for root in container.catalog.root_totals()? {
            output::row(&[&root.id, &root.title, &root.total]);
        }
        return Ok(());
    }

    let forest = container.catalog.tree()?;
    let totals = container.catalog.totals()?;
    for node in forest.iter() {
        output::row(&[&node.id(), &node.title(), &totals.total(node.id())]);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _filter(container: &ServiceContainer, params: SelectionParams, products: bool) -> CliResult<()> {
    let (view, rows) = if products {
        let (view, rows) = container.catalog.list_products(params)?;
        (view, Some(rows))
    } else {
        (container.catalog.resolve_filter(params)?, None)
    };

    let filter = &view.filter;
    if filter.is_unconstrained() {
        output::field("categories", "(all)");
    } else {
        let ids: Vec<&str> = filter.category_ids.iter().map(String::as_str).collect();
        output::field("categories", &ids.join(","));
    }
    if let Some(parent) = &filter.selected_parent {
        output::field("selected parent", parent);
    }
    if let Some(sub) = &filter.selected_subcategory {
        output::field("selected subcategory", sub);
    }
    if !view.subcategories.is_empty() {
        output::header("Subcategories");
        for link in &view.subcategories {
            output::detail(&format!("{} [{}]", link.title, link.id));
        }
    }
    if let Some(rows) = rows {
        output::header(&format!("Products ({})", rows.len()));
        for row in rows {
            output::detail(row.category_id.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _options(
    container: &ServiceContainer,
    exclude: Option<&str>,
    parent: Option<&str>,
) -> CliResult<()> {
    let picker = &container.settings.picker;
    let entries: Vec<OptionEntry> = match parent {
        Some(root) => container.catalog.options_below(Some(root), 0)?,
        None => {
            output::row(&[&picker.no_parent_value, &picker.no_parent_label]);
            container.catalog.picker_options(exclude)?
        }
    };
    for entry in entries {
        output::row(&[&entry.id, &entry.label(&picker.indent)]);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _validate(container: &ServiceContainer, id: &str, parent: &str) -> CliResult<()> {
    require_id(id)?;
    match container.catalog.validate_reparent(id, parent)? {
        ReparentVerdict::Accept => {
            output::success(&format!("{id} may move under {parent}"));
            Ok(())
        }
        ReparentVerdict::Reject(reason) => {
            output::failure(&format!("{id} -> {parent}: {reason}"));
            Err(CliError::Rejected(reason.code().to_string()))
        }
    }
}

#[instrument(skip(container))]
fn _reparent(container: &ServiceContainer, id: &str, parent: &str) -> CliResult<()> {
    require_id(id)?;
    let updated = container.catalog.reparent(id, parent)?;
    let target = format_parent_field(updated.parent_id.as_deref());
    output::success(&format!("{} moved under {}", updated, target));
    Ok(())
}

#[instrument(skip(container))]
fn _check(container: &ServiceContainer) -> CliResult<()> {
    let report = container.catalog.check()?;
    output::field("categories", &report.categories);

    for id in &report.duplicate_ids {
        output::failure(&format!("duplicate id: {id}"));
    }
    for id in &report.self_parented {
        output::failure(&format!("own parent: {id}"));
    }
    for cycle in &report.cycles {
        output::failure(&format!("cycle: {}", cycle.join(" -> ")));
    }
    for (id, parent) in &report.dangling_parents {
        output::warning(&format!("{id} points at missing parent {parent}, shown as root"));
    }

    if report.is_forest() {
        output::success("hierarchy is a forest");
        Ok(())
    } else {
        Err(CliError::Rejected("hierarchy is not a forest".into()))
    }
}

fn require_id(id: &str) -> CliResult<()> {
    if id.trim().is_empty() {
        return Err(CliError::InvalidArgs("category id must not be empty".into()));
    }
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "cannot determine global config directory".into(),
                })?
            } else {
                local_config_path(project_dir)
            };
            init_config(&path)
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::field("global", &p.display()),
                None => output::field("global", "(unavailable)"),
            }
            output::field("local", &local_config_path(project_dir).display());
            Ok(())
        }
    }
}

fn init_config(path: &Path) -> CliResult<()> {
    let fs = RealFileSystem;
    if fs.exists(path) {
        return Err(InfraError::ConfigExists(path.to_path_buf()).into());
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
