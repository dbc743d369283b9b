//! Target operating system detection and the per-OS command lines that go
//! with it.

/// Operating system a configuration builds for, guessed from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOs {
    Windows,
    Linux,
    Mac,
    /// No marker found; no toolchain variables are emitted.
    Unclassified,
}

/// Substring markers, checked top to bottom.  First hit wins.
const OS_MARKERS: &[(&str, TargetOs)] = &[
    ("Win", TargetOs::Windows),
    ("Linux", TargetOs::Linux),
    ("Mac", TargetOs::Mac),
];

/// Compiler, archiver, linker and assembler commands for one OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: &'static str,
    pub archiver: &'static str,
    pub linker: &'static str,
    pub assembler: &'static str,
}

const WINDOWS_TOOLCHAIN: Toolchain = Toolchain {
    compiler: "g++.exe",
    archiver: "ar.exe rcu",
    linker: "g++.exe",
    assembler: "as.exe",
};

const LINUX_TOOLCHAIN: Toolchain = Toolchain {
    compiler: "g++",
    archiver: "ar rcu",
    linker: "g++",
    assembler: "as",
};

const MAC_TOOLCHAIN: Toolchain = Toolchain {
    compiler: "clang++",
    archiver: "ar rcu",
    linker: "clang++",
    assembler: "llvm-as",
};

impl TargetOs {
    /// Classify a configuration by case-sensitive substring match on its name.
    pub fn classify(configuration_name: &str) -> Self {
        OS_MARKERS
            .iter()
            .find(|(marker, _)| configuration_name.contains(marker))
            .map_or(Self::Unclassified, |&(_, os)| os)
    }

    pub fn toolchain(self) -> Option<Toolchain> {
        match self {
            Self::Windows => Some(WINDOWS_TOOLCHAIN),
            Self::Linux => Some(LINUX_TOOLCHAIN),
            Self::Mac => Some(MAC_TOOLCHAIN),
            Self::Unclassified => None,
        }
    }

    fn is_windows(self) -> bool {
        self == Self::Windows
    }

    /// Bring the separators of `path` in line with the OS convention.
    ///
    /// Only Windows rewrites `/`; every other class gets `/` separators.
    pub fn native_separators(self, path: &str) -> String {
        if self.is_windows() {
            path.replace('/', "\\")
        } else {
            path.replace('\\', "/")
        }
    }

    /// Rewrite a build command for this OS.  Windows turns `../` into `..\`,
    /// the others turn every `\` into `/`.
    pub fn command(self, command: &str) -> String {
        if self.is_windows() {
            command.replace("../", "..\\")
        } else {
            command.replace('\\', "/")
        }
    }

    /// Recipe line creating `directory` unless it exists.
    pub fn make_directory(self, directory: &str) -> String {
        if self.is_windows() {
            format!("\tcmd /c if not exist {directory} mkdir \"{directory}\"\n")
        } else {
            format!("\tif ! (test -d {directory}) then mkdir -p \"{directory}\"; fi\n")
        }
    }

    /// Recipe lines deleting `directory` and everything below it.
    pub fn remove_directory(self, directory: &str) -> String {
        if self.is_windows() {
            format!("\tcmd /c if exist {directory} rmdir \"{directory}\" /s /q\n")
        } else {
            format!(
                "\tif (test -d {directory}) then rm -rf \"{directory}\"; fi\n\
                 \tif (test -d {directory}) then rmdir \"{directory}\"; fi\n"
            )
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Mac => "Mac",
            Self::Unclassified => "unclassified",
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Debug-Win32", TargetOs::Windows)]
    #[case("Release_Win64", TargetOs::Windows)]
    #[case("Release_Linux_x64", TargetOs::Linux)]
    #[case("Debug_Mac", TargetOs::Mac)]
    #[case("Win_Linux_Mac", TargetOs::Windows)]
    #[case("Linux_Mac", TargetOs::Linux)]
    #[case("Foo", TargetOs::Unclassified)]
    #[case("debug-win32", TargetOs::Unclassified)]
    #[case("", TargetOs::Unclassified)]
    fn classify(#[case] name: &str, #[case] expected: TargetOs) {
        assert_eq!(TargetOs::classify(name), expected);
    }

    #[test]
    fn toolchains() {
        let win = TargetOs::Windows.toolchain().unwrap();
        assert_eq!(
            (win.compiler, win.archiver, win.linker, win.assembler),
            ("g++.exe", "ar.exe rcu", "g++.exe", "as.exe")
        );
        let linux = TargetOs::Linux.toolchain().unwrap();
        assert_eq!(
            (linux.compiler, linux.archiver, linux.linker, linux.assembler),
            ("g++", "ar rcu", "g++", "as")
        );
        let mac = TargetOs::Mac.toolchain().unwrap();
        assert_eq!(
            (mac.compiler, mac.archiver, mac.linker, mac.assembler),
            ("clang++", "ar rcu", "clang++", "llvm-as")
        );
        assert!(TargetOs::Unclassified.toolchain().is_none());
    }

    #[test]
    fn directory_commands() {
        assert_eq!(
            TargetOs::Windows.make_directory("$(EXECUTION_PATH)bin"),
            "\tcmd /c if not exist $(EXECUTION_PATH)bin mkdir \"$(EXECUTION_PATH)bin\"\n"
        );
        assert_eq!(
            TargetOs::Linux.make_directory("$(EXECUTION_PATH)bin"),
            "\tif ! (test -d $(EXECUTION_PATH)bin) then mkdir -p \"$(EXECUTION_PATH)bin\"; fi\n"
        );
        assert_eq!(
            TargetOs::Windows.remove_directory("obj"),
            "\tcmd /c if exist obj rmdir \"obj\" /s /q\n"
        );
        assert_eq!(
            TargetOs::Mac.remove_directory("obj"),
            "\tif (test -d obj) then rm -rf \"obj\"; fi\n\tif (test -d obj) then rmdir \"obj\"; fi\n"
        );
    }

    #[test]
    fn unclassified_uses_posix_syntax() {
        assert_eq!(
            TargetOs::Unclassified.make_directory("x"),
            TargetOs::Linux.make_directory("x")
        );
        assert_eq!(TargetOs::Unclassified.command("tools\\gen.sh"), "tools/gen.sh");
    }

    #[test]
    fn command_rewrites() {
        assert_eq!(TargetOs::Windows.command("copy ../a b"), "copy ..\\a b");
        assert_eq!(TargetOs::Linux.command("cp ..\\a\\b c"), "cp ../a/b c");
        assert_eq!(TargetOs::Windows.native_separators("a/b"), "a\\b");
        assert_eq!(TargetOs::Mac.native_separators("a\\b"), "a/b");
    }
}
