use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn billetera(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("billetera").unwrap();
    cmd.env("BILLETERA_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn demo_runs_both_scenarios() {
    let dir = TempDir::new().unwrap();

    billetera(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("₡508,015.40"))
        .stdout(predicate::str::contains("6000-1111"))
        .stdout(predicate::str::contains("Automatización Renta"))
        .stdout(predicate::str::contains("₡5,000.00"));
}

#[test]
fn run_executes_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("sesion.txt");
    fs::write(
        &script,
        "\
login 1-2345-6789 8888-0000 --name Ana
envelope create Renta --target 250000
automation create 88881212 Renta
receive Jefe 8888-1212 5000
envelope list
balance
",
    )
    .unwrap();

    billetera(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bienvenido, Ana"))
        .stdout(predicate::str::contains("apartó el monto en 'Renta'"))
        .stdout(predicate::str::contains("Saldo disponible: ₡514,015.40"));
}

#[test]
fn run_fails_on_first_error() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("malo.txt");
    fs::write(&script, "send X 60001111 999999999\nbalance\n").unwrap();

    billetera(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Saldo insuficiente"))
        .stdout(predicate::str::contains("Saldo disponible").not());
}

#[test]
fn shell_reads_stdin() {
    let dir = TempDir::new().unwrap();

    billetera(&dir)
        .arg("shell")
        .write_stdin("contact add \"Luis Rojas\" 70125566\nenvelope allocate Nada 5\nsalir\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Contacto guardado: Luis Rojas (7012-5566)"))
        .stderr(predicate::str::contains("Sobre no encontrado"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();

    billetera(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("₡509,015.40"));
}
