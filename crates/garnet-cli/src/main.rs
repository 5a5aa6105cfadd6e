mod render;
mod stats;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::debug;
use owo_colors::OwoColorize;

use garnet_parser::config::DEFAULT_MAX_DEPTH;
use garnet_parser::{parse_with, ParserConfig};
use garnet_syntax::walk;

use crate::render::render_diagnostic;
use crate::stats::TreeStats;

#[derive(Parser, Debug)]
#[command(name = "garnet", version, about = "Parse and inspect Ruby-subset source files")]
struct Cli {
    /// Number given to the first line of every input
    #[arg(long, global = true, default_value_t = 1)]
    line: usize,

    /// Deepest expression nesting accepted before giving up
    #[arg(long = "max-depth", global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse each file and report the first syntax error in it
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the syntax tree of a file, inline code or stdin
    Dump {
        /// File to parse; stdin when neither a file nor -e is given
        #[arg(conflicts_with = "code")]
        file: Option<PathBuf>,

        /// Parse CODE instead of a file, under the file name `-e`
        #[arg(short = 'e', value_name = "CODE")]
        code: Option<String>,

        /// Also print node count, depth and per-tag counts
        #[arg(long)]
        stats: bool,
    },
}

/// A program text and the name diagnostics report it under.
struct Input {
    name: String,
    bytes: Vec<u8>,
}

impl Input {
    fn from_file(path: &Path) -> io::Result<Self> {
        Ok(Self {
            name: path.display().to_string(),
            bytes: fs::read(path)?,
        })
    }

    fn from_stdin() -> io::Result<Self> {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        Ok(Self {
            name: "-".to_string(),
            bytes,
        })
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

fn io_error(path: &str, err: &io::Error) {
    eprintln!(
        "{}: {}",
        "error".red().bold(),
        format!("Failed to read {}: {}", path, err).red()
    );
}

impl Cli {
    fn config(&self, file: &str) -> ParserConfig {
        ParserConfig::new(file)
            .with_line(self.line)
            .with_max_depth(self.max_depth)
    }

    fn check(&self, files: &[PathBuf]) -> ExitCode {
        let mut failed = 0usize;
        for path in files {
            let input = match Input::from_file(path) {
                Ok(input) => input,
                Err(err) => {
                    io_error(&path.display().to_string(), &err);
                    failed += 1;
                    continue;
                }
            };
            match parse_with(&self.config(&input.name), &input.bytes) {
                Ok(_) => println!("{}: {}", input.name, "ok".green()),
                Err(diag) => {
                    render_diagnostic(&input.text(), self.line.max(1), &diag);
                    failed += 1;
                }
            }
        }
        debug!("checked {} files, {} failed", files.len(), failed);
        if failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    fn dump(&self, file: Option<&Path>, code: Option<&str>, stats: bool) -> ExitCode {
        let input = match (file, code) {
            (_, Some(code)) => Ok(Input {
                name: "-e".to_string(),
                bytes: code.as_bytes().to_vec(),
            }),
            (Some(path), None) => Input::from_file(path),
            (None, None) => Input::from_stdin(),
        };
        let input = match input {
            Ok(input) => input,
            Err(err) => {
                let name = file.map_or_else(|| "-".to_string(), |p| p.display().to_string());
                io_error(&name, &err);
                return ExitCode::FAILURE;
            }
        };
        match parse_with(&self.config(&input.name), &input.bytes) {
            Ok(root) => {
                print!("{}", walk::dump(&root));
                if stats {
                    print!("{}", TreeStats::collect(&root));
                }
                ExitCode::SUCCESS
            }
            Err(diag) => {
                render_diagnostic(&input.text(), self.line.max(1), &diag);
                ExitCode::FAILURE
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().filter("GARNET_LOG"));
    let cli = Cli::parse();
    match &cli.command {
        Command::Check { files } => cli.check(files),
        Command::Dump { file, code, stats } => cli.dump(file.as_deref(), code.as_deref(), *stats),
    }
}
