pub mod http;
pub mod response;
pub mod traits;
