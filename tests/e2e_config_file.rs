/// End-to-end tests for config file loading and CLI overrides
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a config file at the specified path.
fn write_config(path: &std::path::Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hmc-lab")
}

fn host_names(stdout: &[u8]) -> Vec<String> {
    let json: Value = serde_json::from_slice(stdout).unwrap();
    let mut hosts: Vec<String> = json["_meta"]["hostvars"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    hosts.sort_unstable();
    hosts
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_in_working_directory() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("hmc-inventory.config.yml"),
            &format!(
                r#"
hmc_hosts:
  - host: hmc1
    user: hscroot
    password: abc123
transport: fixture
fixture_dir: {}
exclude_partitions:
  - "test-*"
"#,
                fixtures_path().display()
            ),
        );

        let output = cargo_bin_cmd!("hmc-inventory")
            .current_dir(dir.path())
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(host_names(&output.stdout), vec!["aix01", "ibmi01", "lnx01"]);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Excluded 1 partition(s)"));
    }

    #[test]
    fn test_relative_fixture_dir_resolves_against_config() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("recorded").join("hmc1");
        let system_dir = nested.join("sys-a");
        fs::create_dir_all(&system_dir).unwrap();
        fs::write(
            nested.join("systems.json"),
            r#"[{"UUID": "sys-a", "SystemName": "lab", "MTMS": "8286-42A*21A0B1C"}]"#,
        )
        .unwrap();
        fs::write(
            system_dir.join("partitions.json"),
            r#"[{"PartitionName": "web01", "PartitionID": 1, "PartitionType": "AIX/Linux", "OperatingSystemVersion": "AIX 7.3"}]"#,
        )
        .unwrap();

        let config_path = dir.path().join("custom.yml");
        write_config(
            &config_path,
            r#"
hmc_hosts: [hmc1]
default_user: hscroot
default_password: abc123
transport: fixture
fixture_dir: recorded
"#,
        );

        let output = cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(host_names(&output.stdout), vec!["web01"]);
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_invalid_yaml_is_an_application_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("broken.yml");
        write_config(&config_path, "hmc_hosts: [unclosed\n");

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_group_key_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad-group.yml");
        write_config(
            &config_path,
            r#"
hmc_hosts: [hmc1]
group_by:
  - key: Datacenter
"#,
        );

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid tag key: Datacenter"));
    }

    #[test]
    fn test_fixture_transport_requires_directory() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("no-dir.yml");
        write_config(
            &config_path,
            r#"
hmc_hosts: [hmc1]
transport: fixture
"#,
        );

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("fixture_dir"));
    }

    #[test]
    fn test_missing_password_env_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("env.yml");
        write_config(
            &config_path,
            &format!(
                r#"
hmc_hosts:
  - host: hmc1
    user: hscroot
    password_env: HMC_INVENTORY_E2E_UNSET
fixture_dir: {}
transport: fixture
"#,
                fixtures_path().display()
            ),
        );

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .env_remove("HMC_INVENTORY_E2E_UNSET")
            .assert()
            .code(3)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Missing credential for HMC hmc1"));
    }

    #[test]
    fn test_unknown_field_warns_but_runs() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("extra.yml");
        write_config(
            &config_path,
            &format!(
                r#"
hmc_hosts: [hmc2]
default_user: hscroot
default_password: abc123
transport: fixture
fixture_dir: {}
inventory_cache: true
"#,
                fixtures_path().display()
            ),
        );

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .assert()
            .code(0)
            .stderr(predicate::str::contains(
                "Unknown config field 'inventory_cache'",
            ));
    }
}

// ============================================================================
// CLI + Config Merge Tests
// ============================================================================

mod merge_tests {
    use super::*;

    fn templated_config(dir: &TempDir) -> PathBuf {
        let config_path = dir.path().join("templated.yml");
        write_config(
            &config_path,
            &format!(
                r#"
hmc_hosts:
  - "hmc${{n}}"
vars:
  n: 1
default_user: hscroot
default_password_env: HMC_INVENTORY_E2E_PASSWORD
transport: fixture
fixture_dir: {}
format: yaml
filters:
  PartitionState: [running]
"#,
                fixtures_path().display()
            ),
        );
        config_path
    }

    #[test]
    fn test_config_values_apply() {
        let dir = TempDir::new().unwrap();
        let config_path = templated_config(&dir);

        cargo_bin_cmd!("hmc-inventory")
            .args(["-c", config_path.to_str().unwrap()])
            .env("HMC_INVENTORY_E2E_PASSWORD", "abc123")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("_meta:"))
            .stdout(predicate::str::contains("aix01"))
            // Not running, filtered out
            .stdout(predicate::str::contains("test-01").not())
            .stdout(predicate::str::contains("ibmi01").not());
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = TempDir::new().unwrap();
        let config_path = templated_config(&dir);

        let output = cargo_bin_cmd!("hmc-inventory")
            .args([
                "-c",
                config_path.to_str().unwrap(),
                "--var",
                "n=2",
                "-f",
                "json",
            ])
            .env("HMC_INVENTORY_E2E_PASSWORD", "abc123")
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(host_names(&output.stdout), vec!["db01", "ibmi01"]);
    }

    #[test]
    fn test_fixture_dir_flag_overrides_transport() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("rest.yml");
        write_config(
            &config_path,
            r#"
hmc_hosts: [hmc2]
default_user: hscroot
default_password: abc123
"#,
        );

        let output = cargo_bin_cmd!("hmc-inventory")
            .args([
                "-c",
                config_path.to_str().unwrap(),
                "--fixture-dir",
                fixtures_path().to_str().unwrap(),
            ])
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(host_names(&output.stdout), vec!["db01", "ibmi01"]);
    }
}
