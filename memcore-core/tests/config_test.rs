use memcore_core::MemCoreConfig;

#[test]
fn default_config_validates() {
    let config = MemCoreConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn default_tiers_are_monotone() {
    let config = MemCoreConfig::default();
    for window in config.tiers.windows(2) {
        assert!(window[1].token_capacity > window[0].token_capacity);
        assert!(window[1].importance_threshold < window[0].importance_threshold);
    }
}

#[test]
fn token_budget_is_sum_of_tier_capacities() {
    let config = MemCoreConfig::default();
    let expected: u32 = config.tiers.iter().map(|t| t.token_capacity).sum();
    assert_eq!(config.token_budget(), expected);
}

#[test]
fn rejects_non_increasing_capacities() {
    let mut config = MemCoreConfig::default();
    config.tiers[1].token_capacity = config.tiers[0].token_capacity;
    assert!(config.validate().is_err());
}

#[test]
fn rejects_non_decreasing_thresholds() {
    let mut config = MemCoreConfig::default();
    config.tiers[1].importance_threshold = config.tiers[0].importance_threshold;
    assert!(config.validate().is_err());
}

#[test]
fn roundtrips_through_toml() {
    let config = MemCoreConfig::default();
    let toml_str = config.to_toml().expect("serialize");
    let restored = MemCoreConfig::from_toml(&toml_str).expect("deserialize");
    assert_eq!(restored.token_budget(), config.token_budget());
    assert_eq!(restored.tiers.len(), config.tiers.len());
}

#[test]
fn empty_tiers_rejected() {
    let mut config = MemCoreConfig::default();
    config.tiers.clear();
    assert!(config.validate().is_err());
}
