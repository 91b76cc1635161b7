//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Database URL or path (SQLite)
    pub database_url: String,

    /// JWT signing secret for the auth cookie
    pub jwt_secret: String,

    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,

    /// Object storage bucket for post media
    pub storage_bucket: String,

    /// Object storage region
    pub storage_region: String,

    /// Object storage access key id
    pub storage_access_key: String,

    /// Object storage secret access key
    pub storage_secret_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "sqlite://./data/commune.db?mode=rwc".to_string());

        // In production JWT_SECRET must be set explicitly; the fallback only
        // exists so a dev checkout runs with zero configuration.
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "devsecret".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:5173".to_string(),
                    "https://studio.apollographql.com".to_string(),
                    "https://sandbox.embed.apollographql.com".to_string(),
                ]
            });

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4200".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            jwt_secret,

            allowed_origins,

            storage_bucket: env::var("AWS_BUCKET_NAME")
                .unwrap_or_else(|_| "gp-bucket-001".to_string()),

            storage_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),

            storage_access_key: env::var("AWS_ACCESS_KEY").unwrap_or_default(),

            storage_secret_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
        })
    }
}
