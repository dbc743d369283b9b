//! Owned representation of a CodeLite workspace and its projects.
//!
//! The parser fills these types once per run; the generator only reads them.
//! Named configurations hold exactly what their `<Configuration>` element
//! declares: global settings are never folded in here, they are inherited by
//! reference in the generated script.

// ═══════════════════════════════════════════════════════════════════════════════
//  Workspace
// ═══════════════════════════════════════════════════════════════════════════════

/// Root representation of a `.workspace` file (`<CodeLite_Workspace>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub name: String,
    /// Projects in document order, which is also the build fan-out order.
    pub projects: Vec<Project>,
    pub configurations: Vec<WorkspaceConfiguration>,
}

/// A `<WorkspaceConfiguration>` entry of the `<BuildMatrix>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceConfiguration {
    pub name: String,
    /// `(project name, project configuration name)` pairs, in document order.
    pub projects: Vec<(String, String)>,
}

impl Workspace {
    /// Look up a project by its `Name`.
    pub fn find_project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Look up a workspace configuration by its `Name`.
    pub fn find_configuration_by_name(&self, name: &str) -> Option<&WorkspaceConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Names of all workspace configurations, in document order.
    pub fn configuration_names(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name.as_str()).collect()
    }
}

impl WorkspaceConfiguration {
    /// The project configuration selected for `project` under this workspace
    /// configuration, if the build matrix mentions the project.
    pub fn project_configuration(&self, project: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|(name, _)| name == project)
            .map(|(_, config)| config.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Project
// ═══════════════════════════════════════════════════════════════════════════════

/// Name shown for the global configuration by front-ends that list
/// configurations alongside the named ones.
pub const GLOBAL_CONFIGURATION_LABEL: &str = "<Global>";

/// A `.project` file (`<CodeLite_Project>`) as referenced from the workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    /// Location of the `.project` file, relative to the workspace file.
    pub path: String,
    /// Every `<File Name=…>` found in the virtual-directory tree, in pre-order.
    pub code_files: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub configurations: Vec<ProjectConfiguration>,
    pub global_configuration: ProjectConfiguration,
}

/// A named `<Dependencies>` set.  Carried through, never used for ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dependency {
    pub name: String,
    pub projects: Vec<String>,
}

impl Project {
    /// Look up a named configuration.  The global configuration is not
    /// returned here; see [`configuration_or_global`](Self::configuration_or_global).
    pub fn find_configuration_by_name(&self, name: &str) -> Option<&ProjectConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Like [`find_configuration_by_name`](Self::find_configuration_by_name),
    /// but [`GLOBAL_CONFIGURATION_LABEL`] selects the global configuration.
    pub fn configuration_or_global(&self, name: &str) -> Option<&ProjectConfiguration> {
        if name == GLOBAL_CONFIGURATION_LABEL {
            Some(&self.global_configuration)
        } else {
            self.find_configuration_by_name(name)
        }
    }

    /// Code files that take part in the build (`.cpp`, case-sensitive
    /// substring match), in discovery order.
    pub fn compiled_files(&self) -> impl Iterator<Item = &str> {
        self.code_files
            .iter()
            .map(String::as_str)
            .filter(|f| f.contains(".cpp"))
    }

    /// Location of the project's Makefile relative to the workspace file:
    /// `path` with `/` separators and `.mak` appended.
    pub fn makefile_path(&self) -> String {
        format!("{}.mak", self.path.replace('\\', "/"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// What a configuration links into, from the `Type` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputKind {
    Executable,
    DynamicLibrary,
    StaticLibrary,
    #[default]
    Unknown,
}

impl OutputKind {
    /// Exact match against the strings CodeLite writes; anything else is
    /// [`OutputKind::Unknown`].
    pub fn from_type_attribute(value: Option<&str>) -> Self {
        match value {
            Some("Executable") => Self::Executable,
            Some("Dynamic Library") => Self::DynamicLibrary,
            Some("Static Library") => Self::StaticLibrary,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Executable => "Executable",
            Self::DynamicLibrary => "Dynamic Library",
            Self::StaticLibrary => "Static Library",
            Self::Unknown => "Unknown",
        })
    }
}

/// A `<Configuration>` or the `<GlobalSettings>` of a project.
///
/// For the global configuration `name`, `output_file` and
/// `intermediate_directory` are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfiguration {
    pub name: String,
    /// Raw `Options` attribute of `<Compiler>`, `;`-separated.
    pub compiler_options: String,
    /// Raw `Options` attribute of `<Linker>`, `;`-separated.
    pub linker_options: String,
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    /// Library names without `-l` or extension.
    pub libraries: Vec<String>,
    /// `NAME` or `NAME=VALUE`, without `-D`.
    pub preprocessor_definitions: Vec<String>,
    pub output_file: String,
    pub intermediate_directory: String,
    /// Enabled pre-build commands only.
    pub pre_build_commands: Vec<String>,
    /// Enabled post-build commands only.
    pub post_build_commands: Vec<String>,
    pub output_kind: OutputKind,
}

impl ProjectConfiguration {
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            name: "App".into(),
            path: "App/App.project".into(),
            code_files: vec!["main.cpp".into(), "main.h".into(), "util.cpp".into()],
            configurations: vec![
                ProjectConfiguration {
                    name: "Debug".into(),
                    ..Default::default()
                },
                ProjectConfiguration {
                    name: "Release".into(),
                    ..Default::default()
                },
            ],
            global_configuration: ProjectConfiguration {
                include_paths: vec!["inc".into()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn output_kind_exact_match() {
        assert_eq!(OutputKind::from_type_attribute(Some("Executable")), OutputKind::Executable);
        assert_eq!(
            OutputKind::from_type_attribute(Some("Dynamic Library")),
            OutputKind::DynamicLibrary
        );
        assert_eq!(
            OutputKind::from_type_attribute(Some("Static Library")),
            OutputKind::StaticLibrary
        );
        assert_eq!(OutputKind::from_type_attribute(Some("executable")), OutputKind::Unknown);
        assert_eq!(OutputKind::from_type_attribute(Some("")), OutputKind::Unknown);
        assert_eq!(OutputKind::from_type_attribute(None), OutputKind::Unknown);
    }

    #[test]
    fn find_configuration_by_name() {
        let project = sample_project();
        assert_eq!(project.find_configuration_by_name("Release").unwrap().name, "Release");
        assert!(project.find_configuration_by_name("Profile").is_none());
        assert!(project.find_configuration_by_name("").is_none());
    }

    #[test]
    fn global_label_selects_global_configuration() {
        let project = sample_project();
        let global = project.configuration_or_global(GLOBAL_CONFIGURATION_LABEL).unwrap();
        assert!(global.is_global());
        assert_eq!(global.include_paths, vec!["inc".to_string()]);
        assert_eq!(project.configuration_or_global("Debug").unwrap().name, "Debug");
    }

    #[test]
    fn compiled_files_keep_only_cpp() {
        let project = sample_project();
        let files: Vec<&str> = project.compiled_files().collect();
        assert_eq!(files, vec!["main.cpp", "util.cpp"]);
    }

    #[test]
    fn makefile_path_uses_forward_slashes() {
        let mut project = sample_project();
        assert_eq!(project.makefile_path(), "App/App.project.mak");
        project.path = "Core\\Core.project".into();
        assert_eq!(project.makefile_path(), "Core/Core.project.mak");
    }

    #[test]
    fn workspace_lookups() {
        let workspace = Workspace {
            name: "Demo".into(),
            projects: vec![sample_project()],
            configurations: vec![WorkspaceConfiguration {
                name: "Debug".into(),
                projects: vec![("App".into(), "Debug".into())],
            }],
        };
        assert_eq!(workspace.find_project_by_name("App").unwrap().path, "App/App.project");
        assert!(workspace.find_project_by_name("Lib").is_none());
        assert_eq!(workspace.configuration_names(), vec!["Debug"]);
        let config = workspace.find_configuration_by_name("Debug").unwrap();
        assert_eq!(config.project_configuration("App"), Some("Debug"));
        assert_eq!(config.project_configuration("Lib"), None);
    }
}
