pub mod error_handler;
pub mod last_resort;
pub mod pipeline;

pub use error_handler::ErrorHandlerMiddleware;
pub use last_resort::{ErrorHandler, HttpErrorHandler, LastResortMiddleware};
pub use pipeline::{Middleware, MiddlewarePipeline, Next, NextFuture};
