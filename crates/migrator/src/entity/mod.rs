pub mod oauth2_scope;
pub mod oauth2_scope_binding;
pub mod oauth_consumer_app;
pub mod sp_token_expiry_config;
pub mod tenant;
