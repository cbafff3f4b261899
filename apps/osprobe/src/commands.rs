//! Command-line surface and dispatch.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::{Config, Listing};

#[derive(Debug, Parser)]
#[command(name = "osprobe", version, about = "Exercise the Moppet OS layer from a shell")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current working directory.
    Cwd,
    /// Change into a directory, then print the new working directory.
    Cd { path: PathBuf },
    /// Print the application data root, or a named subdirectory of it
    /// (created if missing).
    Appdata { name: Option<String> },
    /// List a directory.
    Ls {
        /// Only regular files.
        #[arg(long, conflicts_with = "dirs")]
        files: bool,
        /// Only subdirectories.
        #[arg(long)]
        dirs: bool,
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Print the path of this executable.
    Exe,
    /// Resolve a bare command name like the launcher does.
    Which { name: String },
    /// Launch a program without waiting for it.
    Run {
        /// Seconds the child waits before starting.
        #[arg(long)]
        delay: Option<u32>,
        program: PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Open a URL in the default browser.
    Open { url: String },
    /// Print the platform line terminator, escaped.
    Newline,
}

/// Runs one command. Sentinel results become a failing exit code.
pub fn execute(command: Command, config: &Config) -> ExitCode {
    match command {
        Command::Cwd => print_path(moppet_os::getcwd()),
        Command::Cd { path } => {
            if !moppet_os::chdir(&path) {
                return ExitCode::FAILURE;
            }
            print_path(moppet_os::getcwd())
        }
        Command::Appdata { name: None } => print_path(moppet_os::app_data_dir()),
        Command::Appdata { name: Some(name) } => {
            print_path(moppet_os::custom_app_data_dir(name))
        }
        Command::Ls { files, dirs, path } => {
            let listing = match (files, dirs) {
                (true, _) => Listing::Files,
                (_, true) => Listing::Dirs,
                _ => config.listing,
            };
            for name in list(&path, listing) {
                println!("{}", name.display());
            }
            ExitCode::SUCCESS
        }
        Command::Exe => print_path(moppet_os::executable_path()),
        Command::Which { name } => print_path(moppet_os::search_path(name)),
        Command::Run {
            delay,
            program,
            args,
        } => {
            let delay = delay.unwrap_or(config.launch_delay_secs);
            exit_code(moppet_os::run(program, args, delay))
        }
        Command::Open { url } => {
            let mut opener = moppet_os::WebpageOpener::new();
            exit_code(opener.open(&url))
        }
        Command::Newline => {
            println!("{}", moppet_os::path::newline().escape_default());
            ExitCode::SUCCESS
        }
    }
}

fn list(path: &Path, listing: Listing) -> Vec<PathBuf> {
    match listing {
        Listing::All => moppet_os::listdir(path),
        Listing::Files => moppet_os::listfiles(path),
        Listing::Dirs => moppet_os::listsubdirs(path),
    }
}

fn print_path(path: Option<PathBuf>) -> ExitCode {
    match path {
        Some(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
