//! Command dispatch: wires CLI arguments to services and renders results.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::ReportKind;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, DepthArgs, InputArgs, SalaryArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::ReportPolicy;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| crate::infrastructure::InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "orgcheck", &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => config_command(cli, command),
        Commands::Report {
            input,
            salary,
            depth,
        } => {
            let container = container(cli)?;
            let policy = policy_from(&container.settings, Some(salary), Some(depth));
            report(&container, input, policy, ReportKind::All)
        }
        Commands::Salary { input, salary } => {
            let container = container(cli)?;
            let policy = policy_from(&container.settings, Some(salary), None);
            report(&container, input, policy, ReportKind::Salary)
        }
        Commands::Depth { input, depth } => {
            let container = container(cli)?;
            let policy = policy_from(&container.settings, None, Some(depth));
            report(&container, input, policy, ReportKind::Depth)
        }
        Commands::Tree { input } => tree(&container(cli)?, input),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_dir.as_deref())?;
    if cli.no_header {
        settings.has_header = false;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

/// Command-line values win over configured ones.
fn policy_from(
    settings: &Settings,
    salary: Option<&SalaryArgs>,
    depth: Option<&DepthArgs>,
) -> ReportPolicy {
    let mut policy = settings.policy();
    if let Some(args) = salary {
        policy.min_percent = args.min_percent.unwrap_or(policy.min_percent);
        policy.max_percent = args.max_percent.unwrap_or(policy.max_percent);
    }
    if let Some(args) = depth {
        policy.max_depth = args.max_depth.unwrap_or(policy.max_depth);
    }
    policy
}

fn input_path(settings: &Settings, input: &InputArgs) -> PathBuf {
    input.file.clone().unwrap_or_else(|| {
        output::warning(&format!(
            "no file argument given, using {}",
            settings.input.display()
        ));
        settings.input.clone()
    })
}

#[instrument(level = "debug", skip(container))]
fn report(
    container: &ServiceContainer,
    input: &InputArgs,
    policy: ReportPolicy,
    kind: ReportKind,
) -> CliResult<()> {
    let path = input_path(&container.settings, input);
    output::header("=========== ANALYTICS REPORTS ===========");
    output::detail(&format!("Loading file: {}", path.display()));

    let report = container.analytics().run(&path, policy, kind)?;

    output::orphans(&report.hierarchy.orphans);
    output::detail(&format!("Employees loaded: {}", report.employees_loaded));
    output::detail(&format!(
        "Employees in hierarchy: {}",
        report.hierarchy.tree.len()
    ));
    output::info("");

    if let Some(violations) = &report.violations {
        output::header("----- Report of employees with salary policy violation -----");
        output::info(&output::salary_table(violations, &report.policy));
    }
    if let Some(excess) = &report.excess {
        output::header(&format!(
            "----- Report of employees with reporting line higher than {} -----",
            report.policy.max_depth
        ));
        output::info(&output::depth_table(excess, &report.policy));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn tree(container: &ServiceContainer, input: &InputArgs) -> CliResult<()> {
    let path = input_path(&container.settings, input);
    let loaded = container.analytics().load_hierarchy(&path)?;

    output::orphans(&loaded.hierarchy.orphans);
    output::info(&loaded.hierarchy.tree.to_tree_string());
    output::success(&format!(
        "{} of {} employees in hierarchy, depth {}",
        loaded.hierarchy.tree.len(),
        loaded.employees_loaded,
        loaded.hierarchy.tree.depth()
    ));
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    let local_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let fs = RealFileSystem;
            match global_config_path() {
                Some(path) => print_config_path("global", &path, &fs),
                None => output::detail(&"global: <unavailable>"),
            }
            print_config_path("local", &local_config_path(&local_dir), &fs);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&local_dir)
            };
            init_config(&RealFileSystem, &target)
        }
    }
}

fn print_config_path(label: &str, path: &Path, fs: &dyn FileSystem) {
    let state = if fs.exists(path) { "exists" } else { "not found" };
    output::detail(&format!("{}: {} ({})", label, path.display(), state));
}

fn init_config(fs: &dyn FileSystem, target: &Path) -> CliResult<()> {
    if fs.exists(target) {
        return Err(CliError::InvalidArgs(format!(
            "config file already exists: {}",
            target.display()
        )));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .with_path_context("create config directory", parent)?;
    }
    fs.write(target, &Settings::template())
        .with_path_context("write config", target)?;
    output::success(&format!("created {}", target.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_cli_overrides_when_building_policy_then_flags_win() {
        let settings = Settings::default();
        let salary = SalaryArgs {
            min_percent: Some(10),
            max_percent: None,
        };
        let depth = DepthArgs { max_depth: Some(2) };

        let policy = policy_from(&settings, Some(&salary), Some(&depth));

        assert_eq!(policy.min_percent, 10);
        assert_eq!(policy.max_percent, 50);
        assert_eq!(policy.max_depth, 2);
    }

    #[test]
    fn given_missing_config_when_init_then_writes_template_once() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join(".orgcheck.toml");

        init_config(&RealFileSystem, &target).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, Settings::template());

        let second = init_config(&RealFileSystem, &target);
        assert!(matches!(second, Err(CliError::InvalidArgs(_))));
    }
}
