use vanguard_types::EngineConfig;

/// A valid `EngineConfig` for tests: defaults plus the two relay URLs every
/// config needs to pass `validate()`.
pub fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.relay_urls = vec!["relay-a".into(), "relay-b".into()];
    config
}
