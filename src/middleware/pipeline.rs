//! Middleware pipeline
//!
//! The handle(request, next) composition seam the error middlewares plug
//! into. `Next` wraps the rest of the chain; the terminal handler may fail,
//! and middleware observe that failure as an `Err` from `next.run()`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::HttpResult;
use crate::request::Request;
use crate::response::Response;

/// Type alias for boxed future in Next
pub type NextFuture<'a> = Pin<Box<dyn Future<Output = HttpResult<Response>> + Send + 'a>>;

/// Next represents the rest of the middleware chain
pub struct Next {
    handler: Box<dyn FnOnce(Request) -> NextFuture<'static> + Send>,
}

impl Next {
    /// Create a new Next with a handler function
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(Request) -> NextFuture<'static> + Send + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Run the rest of the middleware chain with the given request
    pub async fn run(self, request: Request) -> HttpResult<Response> {
        (self.handler)(request).await
    }
}

/// Middleware trait with handle(request, next) pattern
///
/// Uses boxed futures to be dyn-compatible.
pub trait Middleware: Send + Sync + std::fmt::Debug {
    /// Handle the request and call the next middleware in the chain
    fn handle(&self, request: Request, next: Next) -> NextFuture<'static>;

    /// Optional middleware name for debugging
    fn name(&self) -> &'static str {
        "Middleware"
    }
}

/// Ordered middleware pipeline
///
/// Registration happens once at startup; the pipeline is read-only while
/// serving.
#[derive(Debug, Default, Clone)]
pub struct MiddlewarePipeline {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewarePipeline {
    /// Create a new empty middleware pipeline
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Add middleware to the pipeline
    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Add an already-shared middleware to the pipeline
    pub fn add_shared(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Execute the middleware pipeline around a terminal handler
    pub async fn execute<F, Fut>(&self, request: Request, handler: F) -> HttpResult<Response>
    where
        F: FnOnce(Request) -> Fut + Send + 'static,
        Fut: Future<Output = HttpResult<Response>> + Send + 'static,
    {
        let mut chain = Box::new(move |req: Request| Box::pin(handler(req)) as NextFuture<'static>)
            as Box<dyn FnOnce(Request) -> NextFuture<'static> + Send>;

        for middleware in self.middleware.iter().rev() {
            let middleware = middleware.clone();
            let next_handler = chain;
            chain = Box::new(move |req: Request| {
                let next = Next::new(next_handler);
                middleware.handle(req, next)
            });
        }

        chain(request).await
    }

    /// Get number of middleware in pipeline
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Check if pipeline is empty
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Get middleware names for debugging
    pub fn names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Method};

    #[derive(Debug)]
    struct TagMiddleware {
        name: &'static str,
    }

    impl Middleware for TagMiddleware {
        fn handle(&self, mut request: Request, next: Next) -> NextFuture<'static> {
            let name = self.name;
            Box::pin(async move {
                request
                    .headers
                    .append("x-seen-by", name.parse().unwrap());
                let response = next.run(request).await?;
                response.header("x-tagged-by", name)
            })
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn request() -> Request {
        Request::new(Method::GET, "/test".parse().unwrap(), HeaderMap::new())
    }

    #[tokio::test]
    async fn test_middleware_run_in_registration_order() {
        let pipeline = MiddlewarePipeline::new()
            .add(TagMiddleware { name: "first" })
            .add(TagMiddleware { name: "second" });

        let response = pipeline
            .execute(request(), |req| async move {
                let seen: Vec<_> = req
                    .headers
                    .get_all("x-seen-by")
                    .iter()
                    .map(|v| v.to_str().unwrap().to_string())
                    .collect();
                assert_eq!(seen, vec!["first", "second"]);
                Ok(Response::ok().text("done"))
            })
            .await
            .unwrap();

        // Response headers are applied unwinding the chain, so the last
        // insert wins on the shared name
        assert_eq!(response.get_header("x-tagged-by").unwrap(), "first");
    }

    #[tokio::test]
    async fn test_handler_errors_surface_to_caller() {
        let pipeline = MiddlewarePipeline::new().add(TagMiddleware { name: "only" });

        let result = pipeline
            .execute(request(), |_req| async move {
                Err(crate::errors::HttpError::not_found())
            })
            .await;

        assert!(matches!(result, Err(crate::errors::HttpError::NotFound)));
    }

    #[tokio::test]
    async fn test_pipeline_info() {
        let pipeline = MiddlewarePipeline::new()
            .add(TagMiddleware { name: "a" })
            .add(TagMiddleware { name: "b" });

        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
        assert_eq!(pipeline.names(), vec!["a", "b"]);

        assert!(MiddlewarePipeline::new().is_empty());
    }
}
