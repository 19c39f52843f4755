//! Command handlers. Each returns the process exit code.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tach_analysis::{add_packages, clean_project, init_project, sync_project, BoundaryEngine};
use tach_core::config::{find_project_config_root, parse_project_config};
use tach_core::constants::{CONFIG_FILE_EXTENSIONS, CONFIG_FILE_NAME, TOOL_NAME};

use crate::args::Command;
use crate::report::{extra_constraints_message, EnvSnapshot, Reporter};

pub fn dispatch(command: Command, env: &EnvSnapshot) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    match command {
        Command::Check { exact, exclude } => check(&cwd, exact, &exclude.paths(), env),
        Command::Sync { prune, exclude } => sync(&cwd, prune, &exclude.paths()),
        Command::Add { paths, tags } => add(&cwd, &paths, &tags),
        Command::Init { depth, exclude } => init(&cwd, depth, &exclude.paths()),
        Command::Clean { force } => clean(&cwd, force),
    }
}

fn config_root(cwd: &Path) -> Result<PathBuf> {
    find_project_config_root(cwd).with_context(|| {
        format!(
            "{CONFIG_FILE_NAME}.{} not found. Run '{TOOL_NAME} init' from the root of your Python project.",
            CONFIG_FILE_EXTENSIONS[0]
        )
    })
}

fn check(cwd: &Path, exact: bool, exclude: &[String], env: &EnvSnapshot) -> Result<ExitCode> {
    let root = config_root(cwd)?;
    let config = parse_project_config(&root)?;
    let exact = exact || config.exact;

    let engine = BoundaryEngine::new(&root, config, exclude)?;
    let report = if exact {
        engine.check_exact()?
    } else {
        tach_analysis::CheckReport {
            errors: engine.check()?,
            extra_constraints: Vec::new(),
        }
    };

    if !report.errors.is_empty() {
        Reporter::new(env, &root).print_errors(&report.errors);
        return Ok(ExitCode::FAILURE);
    }
    if !report.extra_constraints.is_empty() {
        println!("{}", extra_constraints_message(&report.extra_constraints));
        return Ok(ExitCode::FAILURE);
    }
    println!("✅ {}", "All package dependencies validated!".green());
    Ok(ExitCode::SUCCESS)
}

fn sync(cwd: &Path, prune: bool, exclude: &[String]) -> Result<ExitCode> {
    let root = config_root(cwd)?;
    sync_project(&root, prune, exclude)?;
    println!("✅ {}", "Synced dependencies.".green());
    Ok(ExitCode::SUCCESS)
}

fn add(cwd: &Path, paths: &[String], tags: &[String]) -> Result<ExitCode> {
    let root = config_root(cwd)?;
    // Paths are given relative to where the command runs
    let paths: Vec<PathBuf> = paths.iter().map(|p| cwd.join(p)).collect();
    let tags = (!tags.is_empty()).then_some(tags);

    let warnings = add_packages(&root, &paths, tags)?;
    print_warnings(&warnings);
    let done = if paths.len() > 1 {
        "Packages added."
    } else {
        "Package added."
    };
    println!("✅ {}", done.green());
    Ok(ExitCode::SUCCESS)
}

fn init(cwd: &Path, depth: Option<usize>, exclude: &[String]) -> Result<ExitCode> {
    let warnings = init_project(cwd, depth, exclude)?;
    print_warnings(&warnings);
    println!(
        "✅ {}",
        format!("Initialized '{CONFIG_FILE_NAME}.{}'", CONFIG_FILE_EXTENSIONS[0]).green()
    );
    Ok(ExitCode::SUCCESS)
}

fn clean(cwd: &Path, force: bool) -> Result<ExitCode> {
    let root = find_project_config_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
    println!(
        "{}",
        format!("This will DELETE all existing configuration for {TOOL_NAME}.").yellow()
    );
    println!(
        "{}",
        format!("Deletion will occur for project with root: '{}'", root.display()).yellow()
    );

    if !force && !confirm("Confirm deletion [y/N]? ")? {
        println!("{}", "Not deleting configuration.".cyan());
        return Ok(ExitCode::SUCCESS);
    }
    let path = clean_project(&root)?;
    tracing::debug!(path = %path.display(), "configuration deleted");
    Ok(ExitCode::SUCCESS)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt.cyan());
    std::io::stdout().flush()?;
    let mut response = String::new();
    std::io::stdin().lock().read_line(&mut response)?;
    Ok(is_yes(&response))
}

fn is_yes(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("{}", warnings.join("\n").yellow());
    }
}
