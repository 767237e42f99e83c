use tempfile::TempDir;
use vigil::config::EngineConfig;
use vigil::dlp::{DataClassification, DlpManager};
use vigil::scoring::RiskLevel;
use vigil::VigilError;

#[test]
fn test_config_file_with_custom_rule() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[dlp]
enabled = true
alert_on_detection = true
block_on_high_risk = true

[[dlp.rules]]
id = "employee_id"
classification = "internal"
pattern = 'EMP-\d{6}'
confidence = "high"
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    // explicit rules replace the builtin set
    assert_eq!(config.dlp.rules.len(), 1);

    let manager = DlpManager::from_config(&config.dlp).unwrap();
    let analysis = manager.analyze("badge EMP-123456 checked in");
    assert_eq!(analysis.results.len(), 1);
    assert_eq!(
        analysis.results[0].classification,
        DataClassification::Internal
    );
    assert_eq!(analysis.risk_level, Some(RiskLevel::High));
}

#[test]
fn test_bad_rule_pattern_fails_config_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[dlp]
enabled = true
alert_on_detection = true
block_on_high_risk = false

[[dlp.rules]]
id = "broken"
classification = "internal"
pattern = "(unclosed"
confidence = "low"
"#,
    )
    .unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(matches!(err, VigilError::ConfigValidation { .. }));
}

#[test]
fn test_builtin_rules_mask_matched_text() {
    let manager = DlpManager::from_config(&Default::default()).unwrap();
    let secret = "SuperSecretValue99";
    let analysis = manager.analyze(&format!("password={secret}"));

    assert!(!analysis.results.is_empty());
    for result in &analysis.results {
        assert!(
            !result.matched_text.contains(secret),
            "raw secret leaked through masking: {}",
            result.matched_text
        );
        assert!(result.matched_text.contains('*'));
    }
}

#[test]
fn test_blocking_policy_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[dlp]
enabled = true
alert_on_detection = true
block_on_high_risk = true
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    // no explicit rules: the builtin set applies
    assert!(config.dlp.rules.len() > 5);

    let manager = DlpManager::from_config(&config.dlp).unwrap();
    let analysis = manager.analyze("api_key = sk_live_abcdef0123456789");
    assert!(analysis.blocked);

    // medium-confidence PII is reported but never blocked
    let analysis = manager.analyze("contact: alice@example.com");
    assert!(!analysis.results.is_empty());
    assert!(!analysis.blocked);
}

#[test]
fn test_multi_classification_payload() {
    let manager = DlpManager::from_config(&Default::default()).unwrap();
    let analysis = manager.analyze(
        "password=hunter2 and my card is 4111 1111 1111 1111, email bob@corp.example",
    );

    let classifications: Vec<DataClassification> = analysis
        .results
        .iter()
        .map(|r| r.classification)
        .collect();
    assert!(classifications.contains(&DataClassification::Credentials));
    assert!(classifications.contains(&DataClassification::Financial));
    assert!(classifications.contains(&DataClassification::Pii));
    // credentials dominate the rollup
    assert_eq!(analysis.risk_level, Some(RiskLevel::Critical));

    // results come back ordered by position
    let positions: Vec<usize> = analysis.results.iter().map(|r| r.position).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}
