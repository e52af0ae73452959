use std::path::PathBuf;

const DEFAULT_UPLOAD_BUCKET: &str = "fitmycv-uploads";
const DEFAULT_ASSETS_BUCKET: &str = "fitmycv-assets";
const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
const DEFAULT_TEMPLATE_DIR: &str = "/opt/templates";
const DEFAULT_REWRITE_CONCURRENCY: usize = 3;

/// Process-wide, read-only configuration resolved from the environment at
/// cold start and handed to every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Bucket holding uploaded CVs and extraction results (`UPLOAD_BUCKET`)
    pub upload_bucket: String,
    /// Bucket receiving rendered documents (`ASSETS_BUCKET`)
    pub assets_bucket: String,
    /// Bedrock model identifier (`BEDROCK_MODEL_ID`)
    pub model_id: String,
    /// Root of the `<template_id>/index.html` tree (`TEMPLATE_DIR`)
    pub template_dir: PathBuf,
    /// Replace every model call with a deterministic stub (`OFFLINE`)
    pub offline: bool,
    /// Max in-flight section rewrites (`REWRITE_CONCURRENCY`)
    pub rewrite_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload_bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            assets_bucket: DEFAULT_ASSETS_BUCKET.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            offline: false,
            rewrite_concurrency: DEFAULT_REWRITE_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unset keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rewrite_concurrency = match lookup("REWRITE_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => n.max(1),
                Err(_) => {
                    tracing::warn!(
                        "REWRITE_CONCURRENCY={:?} is not a number, using {}",
                        raw,
                        DEFAULT_REWRITE_CONCURRENCY
                    );
                    DEFAULT_REWRITE_CONCURRENCY
                }
            },
            None => defaults.rewrite_concurrency,
        };

        Self {
            upload_bucket: lookup("UPLOAD_BUCKET").unwrap_or(defaults.upload_bucket),
            assets_bucket: lookup("ASSETS_BUCKET").unwrap_or(defaults.assets_bucket),
            model_id: lookup("BEDROCK_MODEL_ID").unwrap_or(defaults.model_id),
            template_dir: lookup("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            offline: lookup("OFFLINE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rewrite_concurrency,
        }
    }
}
