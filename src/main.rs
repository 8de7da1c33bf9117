use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use diff_panes::{
    DiffPanes, format_diff_output, format_split_output, parse_diff, read_diff_input, split_columns,
};

#[derive(Parser)]
#[command(name = "diff-panes")]
#[command(about = "Render unified diffs as annotated listings or side-by-side panes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show working tree changes from a git repository
    Show {
        /// Limit output to these paths (all changed files if empty)
        files: Vec<String>,
        /// Repository to diff
        #[arg(short = 'C', long = "repo", default_value = ".")]
        repo: String,
        /// Lay the changes out as two aligned panes
        #[arg(long)]
        split: bool,
    },
    /// Render unified diff text from a file or stdin
    Render {
        /// Diff file to read (stdin when omitted)
        file: Option<PathBuf>,
        /// Lay the changes out as two aligned panes
        #[arg(long)]
        split: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate a man page
    #[command(hide = true)]
    Man,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { files, repo, split } => {
            let panes = DiffPanes::new(&repo);
            let output = if split {
                panes.split(&files)?
            } else {
                panes.inline(&files)?
            };
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Commands::Render { file, split } => {
            let parsed = parse_diff(&read_diff_input(file.as_deref())?);
            let output = if split {
                format_split_output(&split_columns(&parsed.lines))
            } else {
                format_diff_output(&parsed)
            };
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "diff-panes", &mut io::stdout());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(())
}
