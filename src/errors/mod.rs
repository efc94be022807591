pub mod http_error;
pub mod resolution;

pub use http_error::*;
pub use resolution::*;
