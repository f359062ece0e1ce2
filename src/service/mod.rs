pub mod api;
pub mod http;

pub use api::JobService;
pub use http::HttpJobService;
