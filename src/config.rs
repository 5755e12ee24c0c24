use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnalysisConfig {
    /// Window length used when a request does not pass `days`.
    pub default_days: i64,
    pub max_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_days: 7,
            max_days: 90,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrition-insights".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into()),
        };

        let defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            default_days: env_i64("ANALYSIS_DEFAULT_DAYS").unwrap_or(defaults.default_days),
            max_days: env_i64("ANALYSIS_MAX_DAYS").unwrap_or(defaults.max_days),
        };
        if analysis.default_days < 1 || analysis.default_days > analysis.max_days {
            anyhow::bail!(
                "ANALYSIS_DEFAULT_DAYS must be between 1 and ANALYSIS_MAX_DAYS ({}), got {}",
                analysis.max_days,
                analysis.default_days
            );
        }

        Ok(Self {
            database_url,
            jwt,
            analysis,
        })
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse::<i64>().ok())
}
