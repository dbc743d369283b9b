//! Makefile synthesis from a parsed [`Workspace`] / [`Project`].
//!
//! Two shapes are produced:
//!
//! - a workspace script whose `build<Config>` / `clean<Config>` targets run
//!   `$(MAKE)` on every project script in workspace order, and
//! - one project script per project with a GLOBAL variable block and, for
//!   each named configuration, variables that extend the GLOBAL ones by
//!   reference plus `prebuild`/link/compile/`postbuild`/`build`/`clean`
//!   targets.
//!
//! Every path from the model is embedded relative to a root-path variable
//! (`$(EXECUTION_PATH)` by default) that the caller passes to `make`.
//! Generation never fails; unsupported output kinds are reported as
//! [`Diagnostic`]s next to the text.

use std::fmt::Write as _;

use crate::error::Diagnostic;
use crate::macros::expand_macros;
use crate::model::{OutputKind, Project, ProjectConfiguration, Workspace};
use crate::paths::{PathMode, directory_name, object_name};
use crate::toolchain::TargetOs;

/// Suffix of the variables holding the global configuration.
const GLOBAL_SUFFIX: &str = "GLOBAL";

const CONFIG_RULE: &str = "#------------------------------------------------------------";
const PROJECT_RULE: &str = "#------------------------------------------------------------------------------------------------------------#";
const TITLE_PAD: &str = "------------------------------------";

// ═══════════════════════════════════════════════════════════════════════════════
//  Options
// ═══════════════════════════════════════════════════════════════════════════════

/// Knobs for the generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Name of the Make variable holding the root path, without `$( )`.
    pub root_variable: String,
    pub path_mode: PathMode,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            root_variable: "EXECUTION_PATH".to_string(),
            path_mode: PathMode::Flatten,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_variable(mut self, name: impl Into<String>) -> Self {
        self.root_variable = name.into();
        self
    }

    pub fn path_mode(mut self, mode: PathMode) -> Self {
        self.path_mode = mode;
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Output
// ═══════════════════════════════════════════════════════════════════════════════

/// A generated project script and anything worth warning about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectScript {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Workspace script with default options.
pub fn generate_workspace_script(workspace: &Workspace) -> String {
    MakefileGenerator::default().workspace_script(workspace)
}

/// Project script with default options.
pub fn generate_project_script(project: &Project) -> ProjectScript {
    MakefileGenerator::default().project_script(project)
}

// ═══════════════════════════════════════════════════════════════════════════════
//  MakefileGenerator
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct MakefileGenerator {
    options: GeneratorOptions,
}

impl MakefileGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// `$(ROOT)`, the prefix of every embedded path.
    fn root(&self) -> String {
        format!("$({})", self.options.root_variable)
    }

    fn adjust(&self, path: &str) -> String {
        self.options.path_mode.apply(path)
    }

    // ─── Workspace ───────────────────────────────────────────────────────

    /// Script fanning `build<Config>` / `clean<Config>` out to every project
    /// script, in workspace order.
    pub fn workspace_script(&self, workspace: &Workspace) -> String {
        let root = self.root();
        let mut out = format!("#{TITLE_PAD}{}{TITLE_PAD}#\n\n", workspace.name);
        let mut phony = Vec::new();

        for config in &workspace.configurations {
            for (action, verb) in [("build", "Building"), ("clean", "Cleaning")] {
                let target = format!("{action}{}", config.name);
                let _ = writeln!(out, "{target}:");
                let _ = writeln!(
                    out,
                    "\t@echo \"----------- {verb} configuration {} -----------\"",
                    config.name
                );
                for project in &workspace.projects {
                    let _ = writeln!(
                        out,
                        "\t$(MAKE) {target} -f {root}{} {}=\"{root}\"",
                        project.makefile_path(),
                        self.options.root_variable
                    );
                }
                out.push('\n');
                phony.push(target);
            }
        }

        out.push_str(&phony_line(&phony));
        out
    }

    // ─── Project ─────────────────────────────────────────────────────────

    /// Full script for one project: GLOBAL block, then one block per named
    /// configuration, then the `.PHONY` trailer.
    pub fn project_script(&self, project: &Project) -> ProjectScript {
        let mut script = ProjectScript::default();
        let mut phony = Vec::new();

        let _ = writeln!(script.text, "{PROJECT_RULE}");
        let _ = writeln!(script.text, "#{TITLE_PAD}{}{TITLE_PAD}#", project.name);
        let _ = writeln!(script.text, "{PROJECT_RULE}");
        script.text.push('\n');

        let global = &project.global_configuration;
        script.text.push_str(&expand_macros(
            &self.global_block(global),
            &macros_for(project, global),
        ));

        for config in &project.configurations {
            let block = self.configuration_block(project, config, &mut script.diagnostics);
            script
                .text
                .push_str(&expand_macros(&block, &macros_for(project, config)));

            let name = &config.name;
            phony.extend([
                format!("build{name}"),
                format!("prebuild{name}"),
                name.clone(),
                format!("postbuild{name}"),
                format!("clean{name}"),
            ]);
        }

        script.text.push('\n');
        script.text.push_str(&phony_line(&phony));
        script
    }

    fn global_block(&self, global: &ProjectConfiguration) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{CONFIG_RULE}");
        let _ = writeln!(out, "#----------------------- {GLOBAL_SUFFIX} ---------------------");
        let _ = writeln!(out, "{CONFIG_RULE}");
        self.setting_variables(&mut out, GLOBAL_SUFFIX, None, global);
        out.push('\n');
        out
    }

    /// The six setting variables.  With `base`, each one starts with a
    /// reference to the same variable of that suffix.
    fn setting_variables(
        &self,
        out: &mut String,
        suffix: &str,
        base: Option<&str>,
        config: &ProjectConfiguration,
    ) {
        let root = self.root();
        let inherit = |var: &str| base.map(|b| format!("$({var}_{b})"));

        let includes = config
            .include_paths
            .iter()
            .map(|p| format!("-I{root}{}", self.adjust(p)));
        let library_dirs = config
            .library_paths
            .iter()
            .map(|p| format!("-L{root}{}", self.adjust(p)));
        let libraries = config.libraries.iter().map(|l| format!("-l{l}"));
        let definitions = config
            .preprocessor_definitions
            .iter()
            .map(|d| format!("-D{d}"));
        let compiler_options = self.adjust(&config.compiler_options.replace(';', " "));
        let linker_options = config.linker_options.replace(';', " ");

        out.push_str(&variable(
            "INCLUDES",
            suffix,
            inherit("INCLUDES").into_iter().chain(includes),
        ));
        out.push_str(&variable(
            "LIBRARYDIRS",
            suffix,
            inherit("LIBRARYDIRS").into_iter().chain(library_dirs),
        ));
        out.push_str(&variable(
            "LIBRARIES",
            suffix,
            inherit("LIBRARIES").into_iter().chain(libraries),
        ));
        out.push_str(&variable(
            "COMPILEROPTIONS",
            suffix,
            inherit("COMPILEROPTIONS").into_iter().chain(Some(compiler_options)),
        ));
        out.push_str(&variable(
            "LINKEROPTIONS",
            suffix,
            inherit("LINKEROPTIONS").into_iter().chain(Some(linker_options)),
        ));
        out.push_str(&variable(
            "DEFINITIONS",
            suffix,
            inherit("DEFINITIONS").into_iter().chain(definitions),
        ));
    }

    fn configuration_block(
        &self,
        project: &Project,
        config: &ProjectConfiguration,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let root = self.root();
        let name = &config.name;
        let var = name.to_uppercase();
        let os = TargetOs::classify(name);
        let mut out = String::new();

        let _ = writeln!(out, "{CONFIG_RULE}");
        let _ = writeln!(out, "#------------- {name} --------------");
        let _ = writeln!(out, "{CONFIG_RULE}");

        if let Some(tools) = os.toolchain() {
            let _ = writeln!(out, "CXX_{var} = {}", tools.compiler);
            let _ = writeln!(out, "AR_{var} = {}", tools.archiver);
            let _ = writeln!(out, "LD_{var} = {}", tools.linker);
            let _ = writeln!(out, "AS_{var} = {}", tools.assembler);
        }

        self.setting_variables(&mut out, &var, Some(GLOBAL_SUFFIX), config);

        let output = self.adjust(&config.output_file);
        let intermediate = self.adjust(&config.intermediate_directory);
        let _ = writeln!(out, "OUTPUT_{var} = {root}{output}");
        let _ = writeln!(out, "INTERMEDIARYDIR_{var} = {root}{intermediate}/");

        let sources: Vec<(String, String)> = project
            .compiled_files()
            .map(|file| {
                let object = object_name(file, self.options.path_mode);
                (
                    format!("$(INTERMEDIARYDIR_{var}){object}"),
                    format!("{root}{}", self.adjust(file)),
                )
            })
            .collect();
        out.push_str(&variable(
            "OBJECTS",
            &var,
            sources.iter().map(|(obj, _)| obj.clone()),
        ));
        out.push('\n');

        // Output and intermediate directories, as the OS spells them.
        let output_dir = os.native_separators(&format!("{root}{}", directory_name(&output)));
        let intermediate_dir = os.native_separators(&format!(
            "{root}{}",
            directory_name(&self.adjust(&format!("{}/", config.intermediate_directory)))
        ));

        let _ = writeln!(out, "prebuild{name}:");
        out.push_str(&os.make_directory(&output_dir));
        out.push_str(&os.make_directory(&intermediate_dir));
        for command in &config.pre_build_commands {
            let _ = writeln!(out, "\t{}", os.command(&self.adjust(command)));
        }
        out.push_str("\n\n");

        match config.output_kind {
            OutputKind::Executable => {
                let _ = writeln!(out, "{name}: $(OBJECTS_{var})");
                let _ = writeln!(
                    out,
                    "\t$(LD_{var}) $(LINKEROPTIONS_{var}) $(LIBRARYDIRS_{var}) $(OBJECTS_{var}) $(LIBRARIES_{var}) -o $(OUTPUT_{var})\n"
                );
            }
            OutputKind::DynamicLibrary => {
                let _ = writeln!(out, "{name}: $(OBJECTS_{var})");
                let _ = writeln!(
                    out,
                    "\t$(LD_{var}) -shared $(LINKEROPTIONS_{var}) $(LIBRARYDIRS_{var}) $(OBJECTS_{var}) $(LIBRARIES_{var}) -o $(OUTPUT_{var})\n"
                );
            }
            OutputKind::StaticLibrary => {
                let _ = writeln!(out, "{name}: $(OBJECTS_{var})");
                let _ = writeln!(out, "\t$(AR_{var}) $(OUTPUT_{var}) $(OBJECTS_{var})\n");
            }
            OutputKind::Unknown => {
                log::warn!(
                    "{}/{name}: unsupported output type, no link rule generated",
                    project.name
                );
                diagnostics.push(Diagnostic::UnsupportedOutputKind {
                    project: project.name.clone(),
                    configuration: name.clone(),
                });
            }
        }

        for (object, source) in &sources {
            let _ = writeln!(out, "{object}: {source}");
            let _ = writeln!(
                out,
                "\t$(CXX_{var}) $(COMPILEROPTIONS_{var}) $(DEFINITIONS_{var}) $(INCLUDES_{var}) -c {source} -o {object}\n"
            );
        }

        let _ = writeln!(out, "postbuild{name}:");
        for command in &config.post_build_commands {
            let _ = writeln!(out, "\t{}", os.command(&self.adjust(command)));
        }
        out.push_str("\n\n");

        let _ = writeln!(out, "build{name}: prebuild{name} {name} postbuild{name}\n");

        let _ = writeln!(out, "clean{name}:");
        let _ = writeln!(out, "\trm -f $(OBJECTS_{var})");
        let _ = writeln!(out, "\trm -f $(OUTPUT_{var})");
        out.push_str(&os.remove_directory(&output_dir));
        out.push_str(&os.remove_directory(&intermediate_dir));
        out.push_str("\n\n");

        out
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `$(ProjectName)` and `$(ConfigurationName)` for one block.
fn macros_for<'a>(
    project: &'a Project,
    config: &'a ProjectConfiguration,
) -> [(&'a str, &'a str); 2] {
    [
        ("ProjectName", project.name.as_str()),
        ("ConfigurationName", config.name.as_str()),
    ]
}

/// `NAME_SUFFIX = v1 v2 …`, skipping empty values; `NAME_SUFFIX =` when
/// nothing is left.
fn variable(name: &str, suffix: &str, values: impl IntoIterator<Item = String>) -> String {
    let mut line = format!("{name}_{suffix} =");
    for value in values.into_iter().filter(|v| !v.is_empty()) {
        line.push(' ');
        line.push_str(&value);
    }
    line.push('\n');
    line
}

fn phony_line(targets: &[String]) -> String {
    if targets.is_empty() {
        ".PHONY:".to_string()
    } else {
        format!(".PHONY: {}", targets.join(" "))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
