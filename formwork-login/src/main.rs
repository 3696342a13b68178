mod login;
mod paths;
mod settings;

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::process::ExitCode;

use formwork::FormError;
use log::error;
use simplelog::{Config, LevelFilter, WriteLogger};
use thiserror::Error;

use login::{FakeLoginRepository, LoginForm, Outcome};
use settings::SettingsError;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("invalid form setup: {0}")]
    Form(#[from] FormError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, AppError> {
    let catalog = settings::load_catalog(paths::messages_file().as_deref())?;
    let login = LoginForm::new(catalog)?;
    let repository = FakeLoginRepository::default();

    let outcome = login::run_session(&login, &repository, io::stdin().lock(), io::stdout())?;
    match outcome {
        Outcome::LoggedIn(user) => {
            println!("Welcome {}", user.display_name);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(e) => {
            println!("Login failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
        Outcome::Aborted => Ok(ExitCode::FAILURE),
    }
}

/// Log to latest.log in the cache dir, or to the working directory when no
/// home directory is available. The previous run's log is kept as
/// previous.log.
fn init_logging() {
    let file = paths::log_file()
        .and_then(|path| open_log(&path).ok())
        .or_else(|| File::create("formwork-login.log").ok());

    if let Some(file) = file {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        if path.exists() {
            fs::rename(path, parent.join("previous.log"))?;
        }
    }
    File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_keeps_previous_run() {
        let dir = std::env::temp_dir().join(format!("formwork-login-{}", std::process::id()));
        let latest = dir.join("logs").join("latest.log");

        let mut first = open_log(&latest).unwrap();
        writeln!(first, "first run").unwrap();
        drop(first);

        let mut second = open_log(&latest).unwrap();
        writeln!(second, "second run").unwrap();
        drop(second);

        let previous = dir.join("logs").join("previous.log");
        assert_eq!(fs::read_to_string(&previous).unwrap(), "first run\n");
        assert_eq!(fs::read_to_string(&latest).unwrap(), "second run\n");

        open_log(&latest).unwrap();
        assert_eq!(fs::read_to_string(&previous).unwrap(), "second run\n");

        fs::remove_dir_all(&dir).unwrap();
    }
}
