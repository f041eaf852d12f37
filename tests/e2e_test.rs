/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const LAB_CONFIG: &str = "tests/fixtures/hmc-lab/hmc-inventory.config.yml";

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

/// Writes a config reading the lab fixtures for the given host entries
fn lab_config(dir: &TempDir, hosts_yaml: &str) -> std::path::PathBuf {
    let fixtures = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hmc-lab");
    let path = dir.path().join("lab.yml");
    fs::write(
        &path,
        format!(
            "hmc_hosts:\n{}\ndefault_user: hscroot\ndefault_password: abc123\ntransport: fixture\nfixture_dir: {}\n",
            hosts_yaml,
            fixtures.display()
        ),
    )
    .unwrap();
    path
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal execution
    #[test]
    fn test_exit_code_success() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "--list"])
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("hmc-inventory")
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("--group-by"));
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("hmc-inventory").arg("--version").assert().code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("hmc-inventory")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["-f", "markdown"])
            .assert()
            .code(2);
    }

    /// Exit code 2: --list and --host together
    #[test]
    fn test_exit_code_list_with_host() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["--list", "--host", "aix01"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - non-existent config file
    #[test]
    fn test_exit_code_nonexistent_config() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", "does-not-exist.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    /// Exit code 3: no HMC configured at all
    #[test]
    fn test_exit_code_no_hosts() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("hmc-inventory")
            .current_dir(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No HMC hosts configured"));
    }

    /// Exit code 3: a template variable without a value aborts before any fetch
    #[test]
    fn test_exit_code_undefined_variable() {
        let dir = TempDir::new().unwrap();
        let config = lab_config(&dir, "  - \"hmc${n}\"");
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config.to_str().unwrap()])
            .assert()
            .code(3)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Undefined variable 'n'"));
    }

    /// Exit code 1: --strict with an unreachable HMC still prints the inventory
    #[test]
    fn test_exit_code_strict_partial() {
        let dir = TempDir::new().unwrap();
        let config = lab_config(&dir, "  - hmc1\n  - hmc9");
        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config.to_str().unwrap(), "--strict"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json = stdout_json(&output);
        assert!(json["_meta"]["hostvars"]["aix01"].is_object());
    }
}

mod inventory_output_tests {
    use super::*;

    #[test]
    fn test_list_merges_both_hmcs() {
        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "--list"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        let hostvars = json["_meta"]["hostvars"].as_object().unwrap();
        let mut hosts: Vec<&str> = hostvars.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        assert_eq!(hosts, vec!["aix01", "db01", "ibmi01", "lnx01", "test-01"]);

        // hmc2 is listed last, so its view of the shared system wins
        assert_eq!(hostvars["ibmi01"]["hmc_host"], "hmc2");
        assert_eq!(hostvars["ibmi01"]["hmc_partition_state"], "running");

        assert_eq!(
            json["system_p10_lab"]["hosts"],
            serde_json::json!(["db01", "ibmi01"])
        );
        assert_eq!(json["prod"]["hosts"], serde_json::json!(["aix01", "db01"]));
        assert_eq!(json["db"]["hosts"], serde_json::json!(["db01"]));
        assert!(json["all"]["children"]
            .as_array()
            .unwrap()
            .contains(&Value::from("system_p9_lab")));
    }

    #[test]
    fn test_unreachable_hmc_is_reported_on_stderr() {
        let dir = TempDir::new().unwrap();
        let config = lab_config(&dir, "  - hmc9\n  - hmc2");
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config.to_str().unwrap()])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"db01\""))
            .stderr(predicate::str::contains("1 of 2 HMC(s) could not be queried: hmc9"));
    }

    #[test]
    fn test_host_prints_hostvars() {
        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "--host", "aix01"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["ansible_host"], "10.0.0.2");
        assert_eq!(json["hmc_partition_type"], "aix");
        assert_eq!(json["hmc_system_mtms"], "9009-42A*7800AB1");
    }

    #[test]
    fn test_unknown_host_prints_empty_object() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "--host", "nope"])
            .assert()
            .code(0)
            .stdout("{}\n");
    }

    #[test]
    fn test_yaml_format() {
        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "-f", "yaml"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("_meta:"))
            .stdout(predicate::str::contains("hostvars:"));
    }

    #[test]
    fn test_include_vios_and_group_by_override() {
        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "--include-vios", "-g", "HostType"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["type_vios"]["hosts"], serde_json::json!(["vios1"]));
        // --group-by replaces the configured grouping
        assert!(json.get("system_p9_lab").is_none());
    }

    #[test]
    fn test_output_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("inventory.json");

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", LAB_CONFIG, "-o", target.to_str().unwrap()])
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Output complete"));

        let content = fs::read_to_string(&target).unwrap();
        let json: Value = serde_json::from_str(&content).unwrap();
        assert!(json["_meta"]["hostvars"]["db01"].is_object());
    }

    #[test]
    fn test_var_flag_expands_template() {
        let dir = TempDir::new().unwrap();
        let config = lab_config(&dir, "  - \"hmc${n}\"");
        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config.to_str().unwrap(), "--var", "n=1,2"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output);
        assert_eq!(json["_meta"]["hostvars"].as_object().unwrap().len(), 5);
    }
}
