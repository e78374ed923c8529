use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cmd() -> assert_cmd::Command {
    cargo_bin_cmd!("cloud-audit")
}

mod clean_accounts {
    use super::*;

    #[test]
    fn test_clean_snapshot_passes() {
        cmd()
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .code(0)
            .stdout(predicate::str::contains("No findings."))
            .stdout(predicate::str::contains("PASS"));
    }

    #[test]
    fn test_clean_snapshot_passes_in_strict_mode() {
        cmd()
            .arg("--strict")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .code(0)
            .stdout(predicate::str::contains("PASS"));
    }

    #[test]
    fn test_clean_snapshot_passes_under_compliance_preset() {
        cmd()
            .arg("--compliance")
            .arg("hipaa")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .code(0);
    }
}

mod misconfigured_accounts {
    use super::*;

    #[test]
    fn test_public_bucket_fails() {
        cmd()
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("bucket-public"))
            .stdout(predicate::str::contains("HIGH"))
            .stdout(predicate::str::contains("logs-bucket"))
            .stdout(predicate::str::contains("FAIL"));
    }

    #[test]
    fn test_missing_access_block_is_also_reported() {
        cmd()
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("bucket-no-public-access-block"));
    }

    #[test]
    fn test_service_subset_skips_findings_in_other_services() {
        cmd()
            .arg("--services")
            .arg("iam")
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .success()
            .code(0)
            .stdout(predicate::str::contains("bucket-public").not());
    }

    #[test]
    fn test_verbose_shows_evidence() {
        cmd()
            .arg("-v")
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("permissions: READ"));
    }

    #[test]
    fn test_warnings_alone_pass_without_strict() {
        cmd()
            .arg("--services")
            .arg("iam")
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .success()
            .code(0)
            .stdout(predicate::str::contains("iam-no-mfa"))
            .stdout(predicate::str::contains("PASS"));
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        cmd()
            .arg("--strict")
            .arg("--services")
            .arg("iam")
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("FAIL"));
    }
}

mod outages {
    use super::*;

    #[test]
    fn test_failed_collector_fails_the_run() {
        cmd()
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("collector-error"))
            .stdout(predicate::str::contains("Collector errors: 1"));
    }

    #[test]
    fn test_other_services_still_audited_during_outage() {
        cmd()
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("iam-no-mfa"))
            .stdout(predicate::str::contains("iam-stale-access-key"));
    }

    #[test]
    fn test_outage_json_reports_collector_errors() {
        let output = cmd()
            .arg("--format")
            .arg("json")
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["collector_errors"], 1);
        assert_eq!(json["summary"]["ERROR"], 1);

        let findings = json["findings"].as_array().unwrap();
        let error_finding = findings
            .iter()
            .find(|f| f["rule_id"] == "collector-error")
            .expect("collector failure should surface as a finding");
        assert_eq!(error_finding["service"], "database");
        assert_eq!(error_finding["resource_id"], "database");
        assert_eq!(error_finding["severity"], "ERROR");
    }
}

mod output_formats {
    use super::*;

    #[test]
    fn test_json_output_shape() {
        let output = cmd()
            .arg("--format")
            .arg("json")
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["findings"][0]["rule_id"], "bucket-public");
        assert_eq!(json["findings"][0]["service"], "storage");
        assert_eq!(json["findings"][0]["severity"], "HIGH");
        for key in ["HIGH", "MEDIUM", "LOW", "WARNING", "ERROR"] {
            assert!(
                json["summary"].get(key).is_some(),
                "summary should always carry {key}"
            );
        }
        assert_eq!(json["summary"]["HIGH"], 1);
        assert_eq!(json["collector_errors"], 0);
    }

    #[test]
    fn test_json_output_is_deterministic() {
        let run = || {
            cmd()
                .arg("--format")
                .arg("json")
                .arg(fixtures_path().join("public-bucket.json"))
                .assert()
                .failure()
                .get_output()
                .stdout
                .clone()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_clean_json_output_passes() {
        let output = cmd()
            .arg("--format")
            .arg("json")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(json["findings"].as_array().unwrap().is_empty());
        assert_eq!(json["summary"]["HIGH"], 0);
    }

    #[test]
    fn test_csv_output() {
        cmd()
            .arg("--format")
            .arg("csv")
            .arg(fixtures_path().join("public-bucket.json"))
            .assert()
            .failure()
            .stdout(predicate::str::contains(
                "service,severity,resource_id,rule_id,message,evidence",
            ))
            .stdout(predicate::str::contains(
                "storage,HIGH,logs-bucket,bucket-public,",
            ));
    }

    #[test]
    fn test_terminal_inventory_appended() {
        cmd()
            .arg("--inventory")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("STATUS"))
            .stdout(predicate::str::contains("COMPLIANT"))
            .stdout(predicate::str::contains("All checks passed."));
    }

    #[test]
    fn test_csv_inventory_includes_outage_row() {
        cmd()
            .arg("--format")
            .arg("csv")
            .arg("--inventory")
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("service,resource_id,status,details"))
            .stdout(predicate::str::contains("database,database,ERROR,"))
            .stdout(predicate::str::contains("Audit failed:"));
    }
}

mod cli_errors {
    use super::*;

    #[test]
    fn test_unknown_service() {
        cmd()
            .arg("--services")
            .arg("nosuch")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Unknown service 'nosuch'"));
    }

    #[test]
    fn test_unknown_framework() {
        cmd()
            .arg("--compliance")
            .arg("soc2")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Unknown compliance framework"));
    }

    #[test]
    fn test_framework_covering_none_of_the_selection() {
        cmd()
            .arg("--compliance")
            .arg("hipaa")
            .arg("--services")
            .arg("dns")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains(
                "None of the requested services are covered",
            ));
    }

    #[test]
    fn test_nonexistent_snapshot() {
        cmd()
            .arg("/nonexistent/account.json")
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Failed to load snapshot"));
    }

    #[test]
    fn test_broken_config_aborts() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("audit.yaml");
        fs::write(&config_path, "thresholds: [not a map").unwrap();

        cmd()
            .arg("--config")
            .arg(&config_path)
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Failed to parse YAML config"));
    }
}

mod configuration {
    use super::*;

    #[test]
    fn test_threshold_override_suppresses_stale_key_finding() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("audit.yaml");
        fs::write(
            &config_path,
            "thresholds:\n  access_key_max_age_days: 1000000\n",
        )
        .unwrap();

        cmd()
            .arg("--services")
            .arg("iam")
            .arg("--config")
            .arg(&config_path)
            .arg(fixtures_path().join("outage.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("iam-stale-access-key").not())
            .stdout(predicate::str::contains("iam-no-mfa"));
    }

    #[test]
    fn test_run_limit_flags_accepted() {
        cmd()
            .arg("--deadline")
            .arg("30")
            .arg("--concurrency")
            .arg("2")
            .arg(fixtures_path().join("clean.json"))
            .assert()
            .success()
            .code(0);
    }

    #[test]
    fn test_version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("snapshot"));
    }
}
