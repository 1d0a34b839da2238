//! Read access to identity server properties by their dotted names.

use std::collections::HashMap;

use crate::config::IdentityProperties;

pub const ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD: &str = "OAuth.AccessTokenDefaultValidityPeriod";
pub const USER_ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD: &str =
    "OAuth.UserAccessTokenDefaultValidityPeriod";
pub const REFRESH_TOKEN_VALIDITY_PERIOD: &str = "OAuth.RefreshTokenValidityPeriod";

pub trait PropertyReader: Send + Sync {
    fn property(&self, name: &str) -> Option<String>;
}

impl PropertyReader for IdentityProperties {
    fn property(&self, name: &str) -> Option<String> {
        match name {
            ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD => self.access_token_default_validity_period.clone(),
            USER_ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD => {
                self.user_access_token_default_validity_period.clone()
            }
            REFRESH_TOKEN_VALIDITY_PERIOD => self.refresh_token_validity_period.clone(),
            _ => None,
        }
    }
}

impl PropertyReader for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
