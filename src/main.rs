use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use codelite_mak::model::GLOBAL_CONFIGURATION_LABEL;
use codelite_mak::{GeneratorOptions, MakefileGenerator, PathMode, Workspace};

#[derive(Parser)]
#[command(name = "codelite-mak")]
#[command(version)]
#[command(about = "Generate GNU Make scripts from a CodeLite workspace", long_about = None)]
struct Cli {
    /// CodeLite .workspace file
    workspace: PathBuf,

    /// Make variable the scripts use as root for every embedded path
    #[arg(long, value_name = "NAME", default_value = "EXECUTION_PATH")]
    root_variable: String,

    /// Resolve `dir/..` pairs instead of deleting every `../`
    #[arg(long)]
    resolve_paths: bool,

    /// Print the files that would be written without writing them
    #[arg(long, conflicts_with = "show")]
    dry_run: bool,

    /// Print the parsed workspace (or one of its projects) instead of
    /// generating scripts
    #[arg(long, value_name = "PROJECT", num_args = 0..=1, default_missing_value = "")]
    show: Option<String>,

    /// Configuration to display with --show PROJECT
    #[arg(long, value_name = "NAME", default_value = GLOBAL_CONFIGURATION_LABEL)]
    configuration: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let workspace = codelite_mak::parse_workspace(&cli.workspace)
        .with_context(|| format!("failed to read workspace {}", cli.workspace.display()))?;

    if let Some(project) = &cli.show {
        return show(&workspace, project, &cli.configuration);
    }

    let options = GeneratorOptions::new()
        .root_variable(cli.root_variable.clone())
        .path_mode(if cli.resolve_paths {
            PathMode::Resolve
        } else {
            PathMode::Flatten
        });
    let generator = MakefileGenerator::new(options);

    let mut outputs = vec![(
        append_extension(&cli.workspace),
        generator.workspace_script(&workspace),
    )];

    let base_dir = cli.workspace.parent().unwrap_or_else(|| Path::new(""));
    let mut diagnostics = 0;
    for project in &workspace.projects {
        let script = generator.project_script(project);
        diagnostics += script.diagnostics.len();
        outputs.push((base_dir.join(project.makefile_path()), script.text));
    }

    for (path, text) in &outputs {
        if cli.dry_run {
            println!("{}", path.display());
        } else {
            write_ascii(path, text)?;
            log::info!("wrote {}", path.display());
        }
    }

    if diagnostics > 0 {
        log::warn!("{diagnostics} configuration(s) without a link rule");
    }

    Ok(())
}

/// `<file>.mak`, keeping the original extension.
fn append_extension(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".mak");
    PathBuf::from(name)
}

/// Write `text` as ASCII; anything outside it becomes `?`.
fn write_ascii(path: &Path, text: &str) -> Result<()> {
    let ascii: String = text
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect();
    std::fs::write(path, ascii).with_context(|| format!("failed to write {}", path.display()))
}

// ─── --show ──────────────────────────────────────────────────────────────────

fn show(workspace: &Workspace, project: &str, configuration: &str) -> Result<()> {
    if project.is_empty() {
        println!("Workspace: {}", workspace.name);
        let mut names = vec![GLOBAL_CONFIGURATION_LABEL];
        names.extend(workspace.configuration_names());
        println!("Configurations: {}", names.join(", "));
        println!("Projects:");
        for p in &workspace.projects {
            println!("  {} ({})", p.name, p.path);
        }
        return Ok(());
    }

    let Some(p) = workspace.find_project_by_name(project) else {
        bail!("no project named {project} in workspace {}", workspace.name);
    };
    let Some(config) = p.configuration_or_global(configuration) else {
        bail!("project {project} has no configuration named {configuration}");
    };

    println!("Project: {} ({})", p.name, p.path);
    println!("Configuration: {configuration}");
    println!("Output: {}", config.output_file);
    println!("Intermediate directory: {}", config.intermediate_directory);
    println!("Output type: {}", config.output_kind);
    println!("Compiler options: {}", config.compiler_options);
    println!("Linker options: {}", config.linker_options);
    println!("Definitions: {}", config.preprocessor_definitions.join(" "));
    print_list("Include directories", &config.include_paths);
    print_list("Library directories", &config.library_paths);
    print_list("Libraries", &config.libraries);
    print_list("Pre-build commands", &config.pre_build_commands);
    print_list("Post-build commands", &config.post_build_commands);
    print_list("Code files", &p.code_files);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    println!("{title}:");
    for item in items {
        println!("  {item}");
    }
}
