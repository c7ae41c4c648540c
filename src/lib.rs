//! Mindbreeze - client for the Mindbreeze enterprise search API
//!
//! Builds search request documents (query text, paging, ordering,
//! constraints, datasource scoping) and normalizes the backend's nested
//! responses into flat records, a pagination summary and a spelling
//! suggestion. The HTTP transport and the storage of pagination tokens are
//! injected through the [`http::HttpClient`] and [`session::TokenStore`]
//! traits.

pub mod cli;
pub mod config;
pub mod constraints;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod session;

pub use error::{MindbreezeError, Result};
pub use request::QueryBuilder;
pub use response::{NormalizedResponse, ResponseNormalizer};
