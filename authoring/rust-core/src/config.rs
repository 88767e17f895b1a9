use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub default_passing_score: i32,
    pub default_points_reward: i32,
    pub max_import_rows: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let default_passing_score = settings
            .get_int("authoring.default_passing_score")
            .ok()
            .and_then(|v| i32::try_from(v).ok())
            .filter(|v| (0..=100).contains(v))
            .unwrap_or(70);

        let default_points_reward = settings
            .get_int("authoring.default_points_reward")
            .ok()
            .and_then(|v| i32::try_from(v).ok())
            .filter(|v| *v >= 0)
            .unwrap_or(10);

        let max_import_rows = settings
            .get_int("import.max_rows")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(500);

        Ok(Config {
            default_passing_score,
            default_points_reward,
            max_import_rows,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_passing_score: 70,
            default_points_reward: 10,
            max_import_rows: 500,
        }
    }
}
