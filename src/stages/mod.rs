//! Workflow stages.
//!
//! Each stage reads the current `RunState`, talks to at most one
//! collaborator, and returns a `StateUpdate`. None of them can fail the
//! run: failures become descriptive values in the stage's own field.

pub mod execute;
pub mod modify;
pub mod persist;
pub mod plan;
pub mod prompt;
pub mod read;

/// Source kind, judged by path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Python,
    Sql,
    Other,
}

impl SourceKind {
    pub fn of(path: &str) -> Self {
        if path.ends_with(".py") {
            SourceKind::Python
        } else if path.ends_with(".sql") {
            SourceKind::Sql
        } else {
            SourceKind::Other
        }
    }

    /// Fence tag the model is expected to use for this kind.
    pub fn fence_tag(&self) -> Option<&'static str> {
        match self {
            SourceKind::Python => Some("python"),
            SourceKind::Sql => Some("sql"),
            SourceKind::Other => None,
        }
    }

    /// Only Python files are handed to the interpreter.
    pub fn is_executable(&self) -> bool {
        matches!(self, SourceKind::Python)
    }
}

/// The path a file operation will actually target.
pub fn effective_path<'a>(file_path: &'a str, default_file: &'a str) -> &'a str {
    if file_path.is_empty() {
        default_file
    } else {
        file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_by_suffix() {
        assert_eq!(SourceKind::of("utils.py"), SourceKind::Python);
        assert_eq!(SourceKind::of("/srv/db/schema.sql"), SourceKind::Sql);
        assert_eq!(SourceKind::of("notes.txt"), SourceKind::Other);
        assert_eq!(SourceKind::of("happy"), SourceKind::Other);
    }

    #[test]
    fn kind_of_short_paths() {
        assert_eq!(SourceKind::of(""), SourceKind::Other);
        assert_eq!(SourceKind::of("y"), SourceKind::Other);
        assert_eq!(SourceKind::of("py"), SourceKind::Other);
        assert_eq!(SourceKind::of(".py"), SourceKind::Python);
    }

    #[test]
    fn only_python_is_executable() {
        assert!(SourceKind::Python.is_executable());
        assert!(!SourceKind::Sql.is_executable());
        assert!(!SourceKind::Other.is_executable());
    }

    #[test]
    fn effective_path_falls_back() {
        assert_eq!(effective_path("", "modified_code.py"), "modified_code.py");
        assert_eq!(effective_path("a.sql", "modified_code.py"), "a.sql");
    }
}
