use error_set::error_set;
use std::path::Path;
use std::process::Command;

mod diff;
mod split;

pub use diff::{DiffLine, FileDiff, format_diff_output, parse_diff};
pub use split::{SplitDiff, format_split_output, split_columns};

error_set! {
    /// Top-level error for diff-panes operations
    DiffPanesError := {
        #[display("Failed to read {path}: {message}")]
        InputFileFailed { path: String, message: String },
        #[display("Failed to read stdin: {message}")]
        StdinFailed { message: String },
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
    }
}

/// Main interface for rendering a repository's working tree changes
pub struct DiffPanes<'a> {
    repo_path: &'a str,
}

impl<'a> DiffPanes<'a> {
    /// Create a new DiffPanes for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// Get the inline listing for specified files (or all files if empty)
    ///
    /// Each changed line is shown with its old and new line numbers in a
    /// leading gutter.
    ///
    /// # Examples
    /// ```no_run
    /// # use diff_panes::DiffPanes;
    /// let panes = DiffPanes::new(".");
    /// let listing = panes.inline(&[]).unwrap(); // all files
    /// let listing = panes.inline(&["src/main.rs".to_string()]).unwrap();
    /// ```
    pub fn inline(&self, files: &[String]) -> Result<String, GitCommandError> {
        Ok(format_diff_output(&parse_diff(&self.raw_diff(files)?)))
    }

    /// Get the two-pane listing, deletions on the left and additions on
    /// the right
    ///
    /// # Examples
    /// ```no_run
    /// # use diff_panes::DiffPanes;
    /// let panes = DiffPanes::new(".");
    /// let columns = panes.split(&[]).unwrap();
    /// ```
    pub fn split(&self, files: &[String]) -> Result<String, GitCommandError> {
        let parsed = parse_diff(&self.raw_diff(files)?);
        Ok(format_split_output(&split_columns(&parsed.lines)))
    }

    /// Get raw git diff output for the working tree
    fn raw_diff(&self, files: &[String]) -> Result<String, GitCommandError> {
        let mut args = vec!["-C", self.repo_path, "diff", "--no-ext-diff", "--no-color"];

        args.extend(files.iter().map(|s| s.as_str()));

        let output =
            Command::new("git")
                .args(&args)
                .output()
                .map_err(|e| GitCommandError::DiffFailed {
                    message: e.to_string(),
                })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }
}

/// Read diff text from a file, or from stdin when no path is given
pub fn read_diff_input(path: Option<&Path>) -> Result<String, DiffPanesError> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|e| DiffPanesError::InputFileFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
        None => {
            std::io::read_to_string(std::io::stdin()).map_err(|e| DiffPanesError::StdinFailed {
                message: e.to_string(),
            })
        }
    }
}
