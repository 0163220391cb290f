//! AWS Systems Manager Parameter Store client.
//!
//! ## Configuration
//!
//! Built from [`SsmConfig`]. Credentials come from the SDK's default
//! provider chain (environment, shared profile, instance/task role).
//!
//! ## Lookups
//!
//! `GetParametersByPath` never returns the parameter stored at the path
//! itself. When a path lookup yields nothing (or the name is not a valid
//! path, e.g. `test-key`), the client falls back to `GetParameter` on the
//! same name, so a flat parameter can be read through the same call.
//!
//! ## Error mapping
//!
//! | SDK error code           | [`ParameterStoreError`]    |
//! |--------------------------|----------------------------|
//! | `ParameterNotFound`      | `NotFound`                 |
//! | `ValidationException`    | `InvalidIdentifier`        |
//! | `ParameterAlreadyExists` | `AlreadyExists`            |
//! | any other service error  | `Service`                  |
//! | dispatch/timeout/etc.    | `Transport`                |

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::types::{ParameterTier as SdkTier, ParameterType as SdkType, Tag};
use tracing::{debug, info};
use validator::Validate;

use super::error::ParameterStoreError;
use super::{
    Parameter, ParameterStoreClient, ParameterTier, ParameterType, PutParameterRequest, Result,
};
use crate::config::SsmConfig;

/// [`ParameterStoreClient`] for AWS Systems Manager Parameter Store.
#[derive(Debug, Clone)]
pub struct AwsSsmParameterStore {
    client: aws_sdk_ssm::Client,
    page_size: i32,
}

impl AwsSsmParameterStore {
    /// Wraps an already configured SDK client.
    pub fn new(client: aws_sdk_ssm::Client, page_size: i32) -> Self {
        Self { client, page_size }
    }

    /// Loads AWS configuration and builds a client.
    pub async fn from_config(config: &SsmConfig) -> crate::secrets::Result<Self> {
        config.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        info!(
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            endpoint_url = ?config.endpoint_url,
            page_size = config.page_size,
            "Initialized AWS SSM parameter store client"
        );

        Ok(Self::new(aws_sdk_ssm::Client::new(&sdk_config), config.page_size))
    }

    async fn fetch_path(&self, path: &str) -> Result<Vec<Parameter>> {
        let mut pages = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(true)
            .with_decryption(true)
            .max_results(self.page_size)
            .into_paginator()
            .send();

        let mut parameters = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| map_sdk_error(path, e))?;
            for parameter in page.parameters() {
                if let (Some(name), Some(value)) = (parameter.name(), parameter.value()) {
                    parameters.push(Parameter::new(name, value));
                }
            }
        }
        Ok(parameters)
    }

    async fn fetch_exact(&self, name: &str) -> Result<Option<Parameter>> {
        let output = match self.client.get_parameter().name(name).with_decryption(true).send().await
        {
            Ok(output) => output,
            Err(e) => {
                return match map_sdk_error(name, e) {
                    ParameterStoreError::NotFound { .. } => Ok(None),
                    other => Err(other),
                };
            }
        };

        Ok(output.parameter().and_then(|parameter| {
            let value = parameter.value()?;
            Some(Parameter::new(parameter.name().unwrap_or(name), value))
        }))
    }
}

#[async_trait]
impl ParameterStoreClient for AwsSsmParameterStore {
    async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<Parameter>> {
        let mut parameters = match self.fetch_path(prefix).await {
            Ok(parameters) => parameters,
            Err(ParameterStoreError::InvalidIdentifier { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };

        if parameters.is_empty() {
            parameters.extend(self.fetch_exact(prefix).await?);
        }

        debug!(prefix = %prefix, count = parameters.len(), "Fetched parameters from SSM");
        Ok(parameters)
    }

    async fn put_one(&self, request: PutParameterRequest) -> Result<()> {
        let tags = request
            .tags
            .iter()
            .map(|tag| {
                Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()
                    .map_err(|e| ParameterStoreError::service("InvalidTag", e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .put_parameter()
            .name(&request.name)
            .value(request.value.expose_secret())
            .overwrite(request.overwrite)
            .r#type(to_sdk_type(request.parameter_type))
            .set_description(request.description.clone())
            .set_key_id(request.key_id.clone())
            .set_tier(request.tier.map(to_sdk_tier))
            .set_allowed_pattern(request.allowed_pattern.clone())
            .set_data_type(request.data_type.clone())
            .set_tags(if tags.is_empty() { None } else { Some(tags) })
            .send()
            .await
            .map_err(|e| map_sdk_error(&request.name, e))?;

        Ok(())
    }

    async fn delete_one(&self, name: &str) -> Result<()> {
        self.client
            .delete_parameter()
            .name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(name, e))?;
        Ok(())
    }
}

fn to_sdk_type(parameter_type: ParameterType) -> SdkType {
    match parameter_type {
        ParameterType::String => SdkType::String,
        ParameterType::StringList => SdkType::StringList,
        ParameterType::SecureString => SdkType::SecureString,
    }
}

fn to_sdk_tier(tier: ParameterTier) -> SdkTier {
    match tier {
        ParameterTier::Standard => SdkTier::Standard,
        ParameterTier::Advanced => SdkTier::Advanced,
        ParameterTier::IntelligentTiering => SdkTier::IntelligentTiering,
    }
}

fn classify_service_error(
    name: &str,
    code: Option<&str>,
    message: Option<&str>,
) -> ParameterStoreError {
    let message = message.unwrap_or_default();
    match code {
        Some("ParameterNotFound") => ParameterStoreError::not_found(name),
        Some("ValidationException") => ParameterStoreError::invalid_identifier(name, message),
        Some("ParameterAlreadyExists") => ParameterStoreError::already_exists(name),
        Some(code) => ParameterStoreError::service(code, message),
        None => ParameterStoreError::service("Unknown", message),
    }
}

fn map_sdk_error<E, R>(name: &str, err: SdkError<E, R>) -> ParameterStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(_) => classify_service_error(name, err.code(), err.message()),
        _ => ParameterStoreError::transport(DisplayErrorContext(&err).to_string()),
    }
}
