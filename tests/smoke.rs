//! Smoke tests -- verify the binary runs and key subcommands exist.

use assert_cmd::Command;

#[test]
fn test_cli_help() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("CICS global catalog control"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("gcdctl"));
}

#[test]
fn test_status_subcommand_exists() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .args(["status", "--help"])
        .assert()
        .success();
}

#[test]
fn test_set_autostart_subcommand_exists() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .args(["set-autostart", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--override"));
}

#[test]
fn test_set_autostart_rejects_unknown_override() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .args([
            "set-autostart",
            "--gcd",
            "CICS.DFHGCD",
            "--sdfhload",
            "CICS.SDFHLOAD",
            "--override",
            "warm",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown autostart override"));
}

#[test]
fn test_define_prints_idcams_statement() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .env_remove("GCDCTL_CONFIG")
        .args(["define", "--gcd", "CICS.REGION.DFHGCD"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "DEFINE CLUSTER (NAME(CICS.REGION.DFHGCD)",
        ))
        .stdout(predicates::str::contains("RECORDSIZE(4089 32760)"));
}

#[test]
fn test_define_param_replaces_section() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .env_remove("GCDCTL_CONFIG")
        .args([
            "define",
            "--gcd",
            "CICS.REGION.DFHGCD",
            "--param",
            "data.controlintervalsize=4096",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "DATA (NAME(CICS.REGION.DFHGCD.DATA) -\n    CONTROLINTERVALSIZE(4096))",
        ))
        .stdout(predicates::str::contains("RECORDSIZE(4089 32760)"));
}

#[test]
fn test_define_rejects_unknown_section() {
    Command::cargo_bin("gcdctl")
        .unwrap()
        .args(["define", "--gcd", "CICS.REGION.DFHGCD", "--param", "AIX.KEYS=8 0"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown section"));
}
