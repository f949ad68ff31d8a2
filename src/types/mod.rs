//! Types shared by handlers and services.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::StatusResponse;
