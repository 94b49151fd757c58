use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_demo_checkout_completes_and_requests_delivery() {
    let mut cmd = Command::new(cargo_bin!("shopfront"));
    cmd.arg("demo");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Mechanical Keyboard"))
        // 10000 plus the 2% fee and 0.5% shipping
        .stdout(predicate::str::contains("102.50"))
        .stdout(predicate::str::contains("COMPLETED"))
        .stdout(predicate::str::contains("delivery"));
}

#[test]
fn test_demo_checkout_declines_4000_prefixed_card() {
    let mut cmd = Command::new(cargo_bin!("shopfront"));
    cmd.args(["demo", "--number", "4000 0000 0000 0002"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        // No fulfillment for a failed payment.
        .stdout(predicate::str::contains("delivery").not());
}

#[test]
fn test_demo_rejects_malformed_card_number() {
    let mut cmd = Command::new(cargo_bin!("shopfront"));
    cmd.args(["demo", "--number", "1234"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("card number"));
}

#[test]
fn test_online_commands_require_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::new(cargo_bin!("shopfront"));
    // Run from an empty directory so no .env file is picked up.
    cmd.current_dir(dir.path())
        .env_remove("SHOPFRONT_API_BASE_URL")
        .env_remove("SHOPFRONT_API_KEY")
        .arg("products");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("SHOPFRONT_API_BASE_URL"));
}
