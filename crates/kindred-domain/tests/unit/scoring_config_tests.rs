//! Unit tests for scoring configuration validation

use kindred_domain::entities::MatchType;
use kindred_domain::value_objects::{CompatibilityTable, ScoringConfig};

#[test]
fn test_default_config_is_valid() {
    ScoringConfig::default().validate().unwrap();
}

#[test]
fn test_default_tables_are_symmetric() {
    let config = ScoringConfig::default();
    assert_eq!(config.elements.get("fire", "water"), Some(0.4));
    assert_eq!(config.elements.get("water", "fire"), Some(0.4));
    assert_eq!(config.archetypes.get("scholar", "guardian"), Some(0.9));
    assert_eq!(config.colors.get("green", "blue"), Some(0.9));
}

#[test]
fn test_unknown_key_reads_neutral() {
    let config = ScoringConfig::default();
    assert!((config.elements.lookup("fire", "aether", 0.5) - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_fusion_weights_must_sum_to_one() {
    let mut config = ScoringConfig::default();
    config.fusion.vector = 0.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_asymmetric_table_rejected() {
    let mut config = ScoringConfig::default();
    let mut table = config.colors.0.clone();
    table.get_mut("red").unwrap().insert("blue".to_string(), 0.2);
    config.colors = CompatibilityTable(table);
    assert!(config.validate().is_err());
}

#[test]
fn test_out_of_range_entry_rejected() {
    let mut config = ScoringConfig::default();
    config.elements = CompatibilityTable::symmetric(&[("fire", "fire", 1.4)]);
    assert!(config.validate().is_err());
}

#[test]
fn test_ladder_must_descend() {
    let mut config = ScoringConfig::default();
    config.ladder.good = 0.75;
    assert!(config.validate().is_err());
}

#[test]
fn test_ladder_classification() {
    let ladder = ScoringConfig::default().ladder;
    assert_eq!(ladder.classify(0.8), MatchType::Excellent);
    assert_eq!(ladder.classify(0.79), MatchType::Strong);
    assert_eq!(ladder.classify(0.6), MatchType::Good);
    assert_eq!(ladder.classify(0.55), MatchType::Moderate);
    assert_eq!(ladder.classify(0.2), MatchType::Basic);
}
