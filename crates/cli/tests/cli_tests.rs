use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("inventory-chat").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("policy-checked database actions"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("inventory-chat").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_prompt_for_member() {
    let mut cmd = Command::cargo_bin("inventory-chat").unwrap();
    cmd.env_remove("DATABASE_URL")
        .args(["prompt", "--user", "budi", "tampilkan semua barang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nama Pengguna: budi"))
        .stdout(predicate::str::contains("Pengguna adalah admin: tidak"))
        .stdout(predicate::str::contains("Pesan User: tampilkan semua barang"));
}

#[test]
fn test_cli_prompt_for_admin() {
    let mut cmd = Command::cargo_bin("inventory-chat").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("INVENTORY_CHAT_MAX_VALUES_PER_STATEMENT")
        .args(["prompt", "--user", "sari", "--admin", "tambah barang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pengguna adalah admin: ya"))
        .stdout(predicate::str::contains("maksimal 3 values setiap perintah"));
}

#[test]
fn test_cli_migrate_requires_database_url() {
    let mut cmd = Command::cargo_bin("inventory-chat").unwrap();
    cmd.env_remove("DATABASE_URL")
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}
