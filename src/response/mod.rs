pub mod factory;
pub mod file;
pub mod json;
pub mod response;

pub use factory::*;
pub use file::*;
pub use json::*;
pub use response::*;
