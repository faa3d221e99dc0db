//! Remote collaborators consumed by the draft manager and the review flows.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{DraftApi, SubmissionApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
