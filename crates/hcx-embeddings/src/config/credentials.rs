//! CLOVA Studio credentials

use super::{API_KEY_ENV, APIGW_KEY_ENV, APP_ID_ENV};
use crate::error::{HcxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// String whose value is kept out of `Debug` output
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret value
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(**********)")
    }
}

/// The three values every embedding request is authenticated with
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: SecretString,
    apigw_key: SecretString,
    app_id: SecretString,
}

impl Credentials {
    /// Validate and assemble credentials. Missing or blank values are
    /// reported together, by environment variable name.
    pub fn new(
        api_key: Option<SecretString>,
        apigw_key: Option<SecretString>,
        app_id: Option<SecretString>,
    ) -> Result<Self> {
        let mut missing = Vec::new();
        for (value, env) in [
            (&api_key, API_KEY_ENV),
            (&apigw_key, APIGW_KEY_ENV),
            (&app_id, APP_ID_ENV),
        ] {
            if value.as_ref().map_or(true, SecretString::is_blank) {
                missing.push(env);
            }
        }

        match (api_key, apigw_key, app_id) {
            (Some(api_key), Some(apigw_key), Some(app_id)) if missing.is_empty() => Ok(Self {
                api_key,
                apigw_key,
                app_id,
            }),
            _ => Err(HcxError::Config(format!(
                "missing or empty credentials: {} (set them in the config or environment)",
                missing.join(", ")
            ))),
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose()
    }

    pub fn apigw_key(&self) -> &str {
        self.apigw_key.expose()
    }

    pub fn app_id(&self) -> &str {
        self.app_id.expose()
    }
}
