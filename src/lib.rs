#[macro_use]
mod macros;

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod model;

pub use auth::{AuthStrategy, BearerAuth, StaticToken, TokenProvider};
pub use client::{ApiClient, ApiResult};
pub use config::ClientConfig;
pub use error::ApiClientError;
pub use model::{
    CategoryName, CategoryNameUpdate, CategoryNameUpdateBuilder, Created, Dataset, DatasetFile,
    DatasetUpsert, DatasetUpsertBuilder, FeatureSet, FeatureSetUpsert, FeatureSetUpsertBuilder,
    JobCreated, JobSubmission, JobSubmissionBuilder, ResourceId, ResourceRef, User, View,
    ViewUpsert, ViewUpsertBuilder,
};
