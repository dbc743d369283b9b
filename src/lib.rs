pub mod error;
pub mod generator;
pub mod macros;
pub mod model;
pub mod parser;
pub mod paths;
pub mod toolchain;

pub use error::{Diagnostic, ParseError};
pub use generator::{
    GeneratorOptions, MakefileGenerator, ProjectScript, generate_project_script,
    generate_workspace_script,
};
pub use model::{
    Dependency, OutputKind, Project, ProjectConfiguration, Workspace, WorkspaceConfiguration,
};
pub use parser::{parse_project_file, parse_project_str, parse_workspace, parse_workspace_with};
pub use paths::{PathMode, adjust_path, mangle_path};
