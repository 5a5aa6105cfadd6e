use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use garnet_fmt::format_source;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "garnet-fmt", version, about = "Rewrite Ruby-subset source in canonical layout")]
#[command(group(ArgGroup::new("mode").args(["check", "write"])))]
struct Cli {
    /// Exit with status 1 when the file is not already formatted
    #[arg(long)]
    check: bool,

    /// Rewrite the file in place
    #[arg(long)]
    write: bool,

    file: PathBuf,
}

impl Cli {
    fn run(&self) -> Result<(), String> {
        let name = self.file.display().to_string();
        let src = fs::read_to_string(&self.file).map_err(|e| format!("{}: {}", name, e))?;
        let formatted = format_source(&name, &src).map_err(|e| e.to_string())?;
        debug!("{}: formatted {} bytes into {}", name, src.len(), formatted.len());

        if self.check {
            if normalize_newlines(&formatted) != normalize_newlines(&src) {
                return Err(format!("{}: not formatted", name));
            }
            println!("{}: ok", name);
        } else if self.write {
            fs::write(&self.file, &formatted).map_err(|e| format!("{}: {}", name, e))?;
            info!("{}: rewritten", name);
        } else {
            print!("{}", formatted);
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().filter("GARNET_LOG"));
    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}
