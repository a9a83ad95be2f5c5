//! Environment configuration, read once per cold start.
//!
//! Loading goes through a lookup function so tests can supply a map instead of
//! mutating the process environment.

use std::time::Duration;

use fastq_sync_core::error::SyncError;
use fastq_sync_core::requirements::EvaluationMode;

use crate::adapters::http::ServiceEndpoints;
use crate::runtime::HandlerKind;

pub const BUCKET_PREFIX_ENV_VAR: &str = "BYOB_BUCKET_PREFIX";
pub const HANDLER_ENV_VAR: &str = "FASTQ_SYNC_HANDLER";
pub const HOSTNAME_ENV_VAR: &str = "API_HOSTNAME";
pub const HOSTNAME_SSM_PARAMETER_ENV_VAR: &str = "HOSTNAME_SSM_PARAMETER_NAME";
pub const FASTQ_API_URL_ENV_VAR: &str = "FASTQ_API_URL";
pub const UNARCHIVING_API_URL_ENV_VAR: &str = "FASTQ_UNARCHIVING_API_URL";
pub const WORKFLOW_API_URL_ENV_VAR: &str = "WORKFLOW_API_URL";
pub const STRICT_REQUIREMENTS_ENV_VAR: &str = "STRICT_REQUIREMENTS";
pub const API_TIMEOUT_ENV_VAR: &str = "API_TIMEOUT_SECS";

pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Where service hostnames come from when no explicit URL overrides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostnameSource {
    Literal(String),
    SsmParameter(String),
    /// Every service URL is overridden explicitly.
    NotNeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub handler: HandlerKind,
    pub bucket_prefix: String,
    pub mode: EvaluationMode,
    pub api_timeout: Duration,
    pub hostname_source: HostnameSource,
    pub fastq_api_url: Option<String>,
    pub unarchiving_api_url: Option<String>,
    pub workflow_api_url: Option<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let handler = non_blank(HANDLER_ENV_VAR)
            .ok_or_else(|| missing(HANDLER_ENV_VAR))?
            .parse::<HandlerKind>()?;
        let bucket_prefix =
            non_blank(BUCKET_PREFIX_ENV_VAR).ok_or_else(|| missing(BUCKET_PREFIX_ENV_VAR))?;

        let mode = match non_blank(STRICT_REQUIREMENTS_ENV_VAR).as_deref() {
            None => EvaluationMode::Compatible,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => EvaluationMode::Strict,
                "false" | "0" | "no" => EvaluationMode::Compatible,
                _ => {
                    return Err(SyncError::Configuration(format!(
                        "{STRICT_REQUIREMENTS_ENV_VAR} must be true or false, got '{value}'"
                    )));
                }
            },
        };

        let api_timeout = match non_blank(API_TIMEOUT_ENV_VAR) {
            None => DEFAULT_API_TIMEOUT,
            Some(value) => match value.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
                _ => {
                    return Err(SyncError::Configuration(format!(
                        "{API_TIMEOUT_ENV_VAR} must be a positive integer, got '{value}'"
                    )));
                }
            },
        };

        let fastq_api_url = non_blank(FASTQ_API_URL_ENV_VAR);
        let unarchiving_api_url = non_blank(UNARCHIVING_API_URL_ENV_VAR);
        let workflow_api_url = non_blank(WORKFLOW_API_URL_ENV_VAR);

        let every_url_overridden = fastq_api_url.is_some()
            && unarchiving_api_url.is_some()
            && workflow_api_url.is_some();
        let hostname_source = match (
            non_blank(HOSTNAME_ENV_VAR),
            non_blank(HOSTNAME_SSM_PARAMETER_ENV_VAR),
        ) {
            _ if every_url_overridden => HostnameSource::NotNeeded,
            (Some(hostname), _) => HostnameSource::Literal(hostname),
            (None, Some(parameter)) => HostnameSource::SsmParameter(parameter),
            (None, None) => {
                return Err(SyncError::Configuration(format!(
                    "{HOSTNAME_ENV_VAR} or {HOSTNAME_SSM_PARAMETER_ENV_VAR} must be configured"
                )));
            }
        };

        Ok(Self {
            handler,
            bucket_prefix,
            mode,
            api_timeout,
            hostname_source,
            fastq_api_url,
            unarchiving_api_url,
            workflow_api_url,
        })
    }

    /// Service base URLs, explicit overrides first. `hostname` is required
    /// unless every URL is overridden.
    pub fn endpoints(&self, hostname: Option<&str>) -> Result<ServiceEndpoints, SyncError> {
        let derived = hostname.map(ServiceEndpoints::for_hostname);
        let pick = |explicit: &Option<String>,
                    derived: Option<&String>,
                    env_var: &str|
         -> Result<String, SyncError> {
            explicit
                .clone()
                .or_else(|| derived.cloned())
                .map(|url| url.trim_end_matches('/').to_string())
                .ok_or_else(|| missing(env_var))
        };

        Ok(ServiceEndpoints {
            fastq: pick(
                &self.fastq_api_url,
                derived.as_ref().map(|value| &value.fastq),
                FASTQ_API_URL_ENV_VAR,
            )?,
            unarchiving: pick(
                &self.unarchiving_api_url,
                derived.as_ref().map(|value| &value.unarchiving),
                UNARCHIVING_API_URL_ENV_VAR,
            )?,
            workflow: pick(
                &self.workflow_api_url,
                derived.as_ref().map(|value| &value.workflow),
                WORKFLOW_API_URL_ENV_VAR,
            )?,
        })
    }
}

fn missing(env_var: &str) -> SyncError {
    SyncError::Configuration(format!("{env_var} must be configured"))
}

pub async fn resolve_hostname(
    source: &HostnameSource,
    ssm_client: &aws_sdk_ssm::Client,
) -> Result<Option<String>, SyncError> {
    match source {
        HostnameSource::Literal(hostname) => Ok(Some(hostname.clone())),
        HostnameSource::NotNeeded => Ok(None),
        HostnameSource::SsmParameter(name) => {
            let output = ssm_client
                .get_parameter()
                .name(name)
                .send()
                .await
                .map_err(|error| {
                    SyncError::Configuration(format!(
                        "failed to read SSM parameter '{name}': {error}"
                    ))
                })?;
            output
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(|value| Some(value.trim().to_string()))
                .ok_or_else(|| {
                    SyncError::Configuration(format!("SSM parameter '{name}' has no value"))
                })
        }
    }
}
