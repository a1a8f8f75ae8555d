//! Async Rust client library for the Marketo asset REST API.
//!
//! Provides OAuth2 client-credentials authentication with expiry tracking,
//! an authenticated request wrapper that validates the Marketo response
//! envelope, and typed endpoint functions for folders, emails, email
//! templates, programs, smart campaigns, tag types and channels.
//!
//! # Modules
//!
//! - [`auth`]: OAuth2 client-credentials token provider.
//! - [`client`]: Authenticated HTTP wrapper for the REST API.
//! - [`config`]: Required settings, validation, JSON/env loading.
//! - [`entity`]: Value types shared across asset families.
//! - [`error`]: Typed error hierarchy (`MarketoError`).
//! - [`params`]: Query/form parameters and pagination.
//! - [`response`]: The `{success, result, errors}` envelope.
//! - [`channels`], [`email_templates`], [`emails`], [`folders`],
//!   [`programs`], [`smart_campaigns`], [`tags`]: asset endpoints.
//!
//! # Quick Start
//!
//! ```ignore
//! use marketo_api::client::MarketoClient;
//! use marketo_api::config::ClientConfig;
//! use marketo_api::folders::get_folder_by_name;
//!
//! let config = ClientConfig::from_json_file("config.json")?;
//! let client = MarketoClient::new(config)?;
//! client.authenticate().await?;
//! let folder = get_folder_by_name(&client, "My Newsletter Program", None).await?;
//! ```

pub mod auth;
pub mod channels;
pub mod client;
pub mod config;
pub mod email_templates;
pub mod emails;
pub mod entity;
pub mod error;
pub mod folders;
pub mod params;
pub mod programs;
pub mod response;
pub mod smart_campaigns;
pub mod tags;

pub use client::MarketoClient;
pub use config::ClientConfig;
pub use error::{MarketoError, Result};
