//! Reading `.workspace` / `.project` documents into the owned
//! [`model`](crate::model) types.
//!
//! Parsing is done with `roxmltree`; nothing is kept of the XML once the
//! model is built.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::error::ParseError;
use crate::model::{
    Dependency, OutputKind, Project, ProjectConfiguration, Workspace, WorkspaceConfiguration,
};

// ═══════════════════════════════════════════════════════════════════════════════
//  Entry points
// ═══════════════════════════════════════════════════════════════════════════════

/// Load a `.workspace` file and every project it references.
///
/// Project paths are resolved against the directory of `path`.
pub fn parse_workspace(path: impl AsRef<Path>) -> Result<Workspace, ParseError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    parse_workspace_with(&source, path, read_if_exists)
}

/// Parse workspace XML, fetching each project's XML through `read_project`.
///
/// `workspace_path` is only used to locate projects and to label errors.
/// `read_project` returns `Ok(None)` when a project file does not exist,
/// which is reported as [`ParseError::MissingProjectFile`]; its errors are
/// passed through.
pub fn parse_workspace_with<F>(
    source: &str,
    workspace_path: &Path,
    mut read_project: F,
) -> Result<Workspace, ParseError>
where
    F: FnMut(&Path) -> Result<Option<String>, ParseError>,
{
    let doc = parse_document(source, workspace_path)?;
    let root = doc.root_element();
    expect_root(root, "CodeLite_Workspace", workspace_path)?;

    let mut workspace = Workspace {
        name: required_attribute(root, "Name", workspace_path)?.to_string(),
        ..Default::default()
    };

    for matrix in child_elements(root, "BuildMatrix") {
        for config in child_elements(matrix, "WorkspaceConfiguration") {
            workspace
                .configurations
                .push(parse_workspace_configuration(config, workspace_path)?);
        }
    }

    let base_dir = workspace_path.parent().unwrap_or_else(|| Path::new(""));

    for node in child_elements(root, "Project") {
        let name = required_attribute(node, "Name", workspace_path)?;
        let relative = required_attribute(node, "Path", workspace_path)?;
        let project_file = project_file_path(base_dir, relative);

        let project_source = read_project(&project_file)?.ok_or_else(|| {
            ParseError::MissingProjectFile {
                path: project_file.clone(),
            }
        })?;

        let project = parse_project_str(&project_source, name, relative, &project_file)?;
        workspace.projects.push(project);
    }

    log::debug!(
        "parsed workspace {} ({} projects, {} configurations)",
        workspace.name,
        workspace.projects.len(),
        workspace.configurations.len()
    );

    Ok(workspace)
}

/// Parse the XML of a single `.project` file.
///
/// `name` and `path` are the values recorded for the project in the
/// workspace; `file` labels errors.
pub fn parse_project_str(
    source: &str,
    name: &str,
    path: &str,
    file: &Path,
) -> Result<Project, ParseError> {
    let doc = parse_document(source, file)?;
    let root = doc.root_element();
    expect_root(root, "CodeLite_Project", file)?;

    let mut project = Project {
        name: name.to_string(),
        path: path.to_string(),
        ..Default::default()
    };

    for dir in child_elements(root, "VirtualDirectory") {
        collect_code_files(dir, file, &mut project.code_files)?;
    }

    for deps in child_elements(root, "Dependencies") {
        // Unnamed sets are how CodeLite writes "no dependencies".
        let Some(set_name) = deps.attribute("Name") else {
            continue;
        };
        project.dependencies.push(Dependency {
            name: set_name.to_string(),
            projects: attributes_of(deps, "Project", "Name", file)?,
        });
    }

    let settings = required_child(root, "Settings", file)?;
    for config in child_elements(settings, "Configuration") {
        project.configurations.push(parse_configuration(config, file)?);
    }
    project.global_configuration =
        parse_configuration(required_child(settings, "GlobalSettings", file)?, file)?;

    log::debug!(
        "parsed project {} ({} code files, {} configurations)",
        project.name,
        project.code_files.len(),
        project.configurations.len()
    );

    Ok(project)
}

/// Load a single `.project` file from disk.
pub fn parse_project_file(
    file: impl AsRef<Path>,
    name: &str,
    path: &str,
) -> Result<Project, ParseError> {
    let file = file.as_ref();
    let source = read_if_exists(file)?.ok_or_else(|| ParseError::MissingProjectFile {
        path: file.to_path_buf(),
    })?;
    parse_project_str(&source, name, path, file)
}

/// Read a file, mapping "not found" to `Ok(None)`.
fn read_if_exists(path: &Path) -> Result<Option<String>, ParseError> {
    match std::fs::read_to_string(path) {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(read_error(path, e)),
    }
}

/// Content that is not UTF-8 is a malformed document; anything else is I/O.
fn read_error(path: &Path, source: std::io::Error) -> ParseError {
    if source.kind() == ErrorKind::InvalidData {
        ParseError::malformed(path, format!("not valid UTF-8: {source}"))
    } else {
        ParseError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Workspace pieces
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_workspace_configuration(
    node: Node,
    file: &Path,
) -> Result<WorkspaceConfiguration, ParseError> {
    let mut config = WorkspaceConfiguration {
        name: required_attribute(node, "Name", file)?.to_string(),
        ..Default::default()
    };

    for project in child_elements(node, "Project") {
        config.projects.push((
            required_attribute(project, "Name", file)?.to_string(),
            required_attribute(project, "ConfigName", file)?.to_string(),
        ));
    }

    Ok(config)
}

/// Location of a project file.  Workspaces written on Windows use `\`.
fn project_file_path(base_dir: &Path, relative: &str) -> PathBuf {
    base_dir.join(relative.replace('\\', "/"))
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Project pieces
// ═══════════════════════════════════════════════════════════════════════════════

/// Pre-order walk: a directory's own files first, then its subdirectories.
fn collect_code_files(dir: Node, file: &Path, files: &mut Vec<String>) -> Result<(), ParseError> {
    files.extend(attributes_of(dir, "File", "Name", file)?);

    for sub in child_elements(dir, "VirtualDirectory") {
        collect_code_files(sub, file, files)?;
    }
    Ok(())
}

/// Shared by `<Configuration>` and `<GlobalSettings>`.
fn parse_configuration(node: Node, file: &Path) -> Result<ProjectConfiguration, ParseError> {
    let compiler = required_child(node, "Compiler", file)?;
    let linker = required_child(node, "Linker", file)?;

    let mut config = ProjectConfiguration {
        name: node.attribute("Name").unwrap_or("").to_string(),
        compiler_options: required_attribute(compiler, "Options", file)?.to_string(),
        linker_options: required_attribute(linker, "Options", file)?.to_string(),
        include_paths: attributes_of(compiler, "IncludePath", "Value", file)?,
        preprocessor_definitions: attributes_of(compiler, "Preprocessor", "Value", file)?,
        library_paths: attributes_of(linker, "LibraryPath", "Value", file)?,
        libraries: attributes_of(linker, "Library", "Value", file)?,
        output_kind: OutputKind::from_type_attribute(node.attribute("Type")),
        ..Default::default()
    };

    if let Some(general) = child_elements(node, "General").next() {
        config.output_file = general.attribute("OutputFile").unwrap_or("").to_string();
        config.intermediate_directory =
            general.attribute("IntermediateDirectory").unwrap_or("").to_string();
    }

    for pre in child_elements(node, "PreBuild") {
        config.pre_build_commands.extend(enabled_commands(pre, file)?);
    }
    for post in child_elements(node, "PostBuild") {
        config.post_build_commands.extend(enabled_commands(post, file)?);
    }

    Ok(config)
}

/// The mandatory `attribute` of every `<tag>` child, in document order.
fn attributes_of(
    parent: Node,
    tag: &'static str,
    attribute: &str,
    file: &Path,
) -> Result<Vec<String>, ParseError> {
    child_elements(parent, tag)
        .map(|n| required_attribute(n, attribute, file).map(String::from))
        .collect()
}

/// Text of each `<Command Enabled="yes">`.  `Enabled` is mandatory.
fn enabled_commands(parent: Node, file: &Path) -> Result<Vec<String>, ParseError> {
    let mut commands = Vec::new();
    for command in child_elements(parent, "Command") {
        if required_attribute(command, "Enabled", file)? == "yes" {
            commands.push(command.text().unwrap_or("").to_string());
        }
    }
    Ok(commands)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn parse_document<'input>(
    source: &'input str,
    file: &Path,
) -> Result<roxmltree::Document<'input>, ParseError> {
    roxmltree::Document::parse(source)
        .map_err(|e| ParseError::malformed(file, format!("XML Error: {e}")))
}

fn expect_root(root: Node, tag: &str, file: &Path) -> Result<(), ParseError> {
    let found = root.tag_name().name();
    if found == tag {
        Ok(())
    } else {
        Err(ParseError::malformed(
            file,
            format!("expected root element <{tag}>, found <{found}>"),
        ))
    }
}

fn child_elements<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn required_child<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'static str,
    file: &Path,
) -> Result<Node<'a, 'input>, ParseError> {
    child_elements(parent, tag).next().ok_or_else(|| {
        ParseError::malformed(
            file,
            format!("<{}> has no <{tag}> element", parent.tag_name().name()),
        )
    })
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    name: &str,
    file: &Path,
) -> Result<&'a str, ParseError> {
    node.attribute(name).ok_or_else(|| {
        ParseError::malformed(
            file,
            format!("<{}> is missing the {name} attribute", node.tag_name().name()),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
