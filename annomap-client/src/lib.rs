pub mod client;
pub mod error;
pub mod model;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use model::{Annotation, Reference};
