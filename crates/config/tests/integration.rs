//! Integration tests for config

#[cfg(test)]
mod tests {
    use banker_config::*;
    use banker_errors::{ConfigError, ConstructionError, Error};
    use banker_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("BANKER_OUTPUT");
        std::env::remove_var("BANKER_COLOR");
        std::env::remove_var("BANKER_SCENARIO");
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[scenario]
path = "/srv/banker/lab.toml"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(
            config.scenario.path.as_deref(),
            Some(std::path::Path::new("/srv/banker/lab.toml"))
        );
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let result = Config::load_from_file(std::path::Path::new("/nonexistent/banker.toml")).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_config_keeps_io_reason() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_file(dir.path()).await;
        match result {
            Err(Error::Config(ConfigError::ReadFailed { path, message })) => {
                assert_eq!(path, dir.path().display().to_string());
                assert!(!message.is_empty());
            }
            other => panic!("expected ReadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scenario_read_errors_are_classified() {
        let missing = Scenario::load_from_file(std::path::Path::new("/nonexistent/lab.toml")).await;
        assert!(matches!(
            missing,
            Err(Error::Config(ConfigError::ScenarioNotFound { .. }))
        ));

        let dir = tempfile::tempdir().unwrap();
        let directory = Scenario::load_from_file(dir.path()).await;
        assert!(matches!(
            directory,
            Err(Error::Config(ConfigError::ReadFailed { .. }))
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("BANKER_OUTPUT", "json");
        std::env::set_var("BANKER_COLOR", "always");
        std::env::set_var("BANKER_SCENARIO", "/tmp/scenario.toml");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert!(config.scenario.path.is_some());

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("BANKER_OUTPUT", "invalid");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }

    #[tokio::test]
    async fn test_default_scenario_is_canonical() {
        let config = Config::default();
        let scenario = config.load_scenario().await.unwrap();
        assert_eq!(scenario, Scenario::canonical());

        let allocator = scenario.into_allocator().unwrap();
        assert_eq!(allocator.process_count(), 5);
        assert_eq!(allocator.resource_count(), 3);
        assert!(allocator.check_safety().is_safe());
    }

    #[tokio::test]
    async fn test_load_scenario_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
processes = 2
available = [1, 0]
maximum = [[1, 1], [2, 1]]
allocation = [[0, 1], [1, 0]]
        "#
        )
        .unwrap();

        let mut config = Config::default();
        config.scenario.path = Some(temp_file.path().to_path_buf());
        let scenario = config.load_scenario().await.unwrap();
        assert_eq!(scenario.processes, Some(2));
        assert_eq!(scenario.resources, None);

        let allocator = scenario.into_allocator().unwrap();
        assert_eq!(allocator.snapshot().need, vec![vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn test_declared_dimensions_are_checked() {
        let mut scenario = Scenario::canonical();
        scenario.resources = Some(4);
        assert!(matches!(
            scenario.into_allocator(),
            Err(Error::Construction(ConstructionError::ShapeMismatch {
                expected: 4,
                actual: 3,
                ..
            }))
        ));

        let mut scenario = Scenario::canonical();
        scenario.processes = Some(6);
        assert!(matches!(
            scenario.into_allocator(),
            Err(Error::Construction(ConstructionError::ShapeMismatch {
                expected: 6,
                actual: 5,
                ..
            }))
        ));
    }

    #[test]
    fn test_declared_zero_processes_is_empty_dimension() {
        let mut scenario = Scenario::canonical();
        scenario.processes = Some(0);
        assert!(matches!(
            scenario.into_allocator(),
            Err(Error::Construction(ConstructionError::EmptyDimension { .. }))
        ));
    }

    #[test]
    fn test_invalid_scenario_reports_construction_error() {
        let scenario = Scenario::from_toml(
            "available = [1]\nmaximum = [[1]]\nallocation = [[2]]\n",
            "inline",
        )
        .unwrap();
        assert!(matches!(
            scenario.into_allocator(),
            Err(Error::Construction(
                ConstructionError::AllocationExceedsMaximum { .. }
            ))
        ));
    }

    #[test]
    fn test_malformed_scenario_toml() {
        let result = Scenario::from_toml("available = \"three\"", "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ParseError { .. }))
        ));
    }
}
