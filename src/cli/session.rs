//! Session commands and the line-driven session loop

use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::{Args, Parser};
use tracing::debug;

use crate::error::{BankError, BankResult};
use crate::models::{BiometricOutcome, BiometricStatus, IdType, LoginPayload};
use crate::services::{AuthService, BiometricCancel, BiometricService};
use crate::storage::BankStore;

use super::{execute, split_line, SessionLine};

/// Arguments for `login`
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Identification number
    pub id: String,
    /// Phone number
    pub phone: String,
    #[arg(short, long)]
    pub name: Option<String>,
    /// nacional, dimex or pasaporte
    #[arg(short = 't', long)]
    pub id_type: Option<String>,
}

/// How a session reacts to errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Prompt, report errors and keep going
    Interactive,
    /// Echo each line and stop at the first error
    Script,
}

/// Handle `login`
pub fn handle_login_command(store: &BankStore, args: LoginArgs) -> BankResult<()> {
    let id_type = args
        .id_type
        .as_deref()
        .map(str::parse::<IdType>)
        .transpose()
        .map_err(BankError::Validation)?;

    let profile = AuthService::new(store).login(LoginPayload {
        name: args.name,
        id_type,
        ..LoginPayload::new(args.id, args.phone)
    })?;

    println!("Bienvenido, {}", profile.name);
    Ok(())
}

fn parse_status(input: &str) -> BankResult<BiometricStatus> {
    match input.trim().to_lowercase().as_str() {
        "success" | "exito" | "éxito" => Ok(BiometricStatus::Success),
        "mismatch" | "fallo" => Ok(BiometricStatus::Mismatch),
        "timeout" => Ok(BiometricStatus::Timeout),
        other => Err(BankError::Validation(format!(
            "Resultado desconocido: '{}'. Use success, mismatch o timeout",
            other
        ))),
    }
}

/// Handle `biometric`
pub async fn handle_biometric_command(store: &BankStore, force: Option<&str>) -> BankResult<()> {
    let mut options = store.settings().biometric.clone();
    if let Some(force) = force {
        options = options.forced(parse_status(force)?);
    }

    println!("Coloque su dedo en el lector...");
    let outcome = BiometricService::new(store)
        .simulate_biometric_validation(&options, &BiometricCancel::new())
        .await?;

    match outcome {
        BiometricOutcome::Completed(attempt) => {
            println!("Resultado: {} ({} ms)", attempt.status, attempt.latency_ms);
        }
        BiometricOutcome::Cancelled => println!("Validación cancelada"),
    }
    Ok(())
}

fn is_exit(line: &str) -> bool {
    matches!(line, "exit" | "quit" | "salir")
}

/// Run session lines from `input` against the store
///
/// Blank lines and lines starting with `#` are skipped. Returns the number
/// of commands executed.
pub async fn run_session<R: BufRead>(
    store: &BankStore,
    input: R,
    mode: SessionMode,
) -> BankResult<usize> {
    let mut executed = 0;

    if mode == SessionMode::Interactive {
        prompt()?;
    }

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let line_no = index + 1;

        if line.is_empty() || line.starts_with('#') {
            if mode == SessionMode::Interactive {
                prompt()?;
            }
            continue;
        }
        if is_exit(line) {
            break;
        }
        if mode == SessionMode::Script {
            println!("> {}", line);
        }

        let result = match split_line(line) {
            Ok(words) => match SessionLine::try_parse_from(words) {
                Ok(parsed) => {
                    debug!(line = line_no, command = ?parsed.command, "executing");
                    executed += 1;
                    execute(store, parsed.command).await
                }
                Err(e)
                    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
                {
                    print!("{}", e);
                    Ok(())
                }
                Err(e) => Err(BankError::Validation(e.to_string())),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            match mode {
                SessionMode::Interactive => eprintln!("Error: {}", e),
                SessionMode::Script => {
                    eprintln!("Error en la línea {}: {}", line_no, e);
                    return Err(e);
                }
            }
        }

        if mode == SessionMode::Interactive {
            prompt()?;
        }
    }

    Ok(executed)
}

fn prompt() -> BankResult<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "billetera> ")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::Money;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Éxito").unwrap(), BiometricStatus::Success);
        assert_eq!(parse_status("timeout").unwrap(), BiometricStatus::Timeout);
        assert!(parse_status("quizás").is_err());
    }

    #[tokio::test]
    async fn test_script_runs_commands() {
        let store = BankStore::new(Settings::default());
        let script = "\
# escenario de sobres
envelope create Renta
automation create 88881212 Renta
receive Jefe 8888-1212 5000

balance
";

        let executed = run_session(&store, script.as_bytes(), SessionMode::Script)
            .await
            .unwrap();

        assert_eq!(executed, 4);
        assert_eq!(store.envelopes().unwrap()[0].balance, Money::from_units(5000));
    }

    #[tokio::test]
    async fn test_script_stops_at_first_error() {
        let store = BankStore::new(Settings::default());
        let script = "send X 60001111 0\nenvelope create Renta\n";

        let result = run_session(&store, script.as_bytes(), SessionMode::Script).await;

        assert!(result.unwrap_err().is_validation());
        assert!(store.envelopes().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_is_validation_error() {
        let store = BankStore::new(Settings::default());
        let result = run_session(&store, "volar\n".as_bytes(), SessionMode::Script).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_exit_stops_reading() {
        let store = BankStore::new(Settings::default());
        let executed = run_session(
            &store,
            "balance\nsalir\nenvelope create Renta\n".as_bytes(),
            SessionMode::Script,
        )
        .await
        .unwrap();
        assert_eq!(executed, 1);
        assert!(store.envelopes().unwrap().is_empty());
    }
}
