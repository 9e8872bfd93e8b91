//! Ordered middleware pipeline in front of the upstream node.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::client::RpcClient;
use super::types::{RpcRequest, RpcResponse};

/// One interception point in the pipeline.
#[async_trait]
pub trait RpcMiddleware: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(Some(result))` answers the request and short-circuits the
    /// pipeline; `Ok(None)` defers to the next handler. A miss is never an
    /// error.
    async fn handle(&self, req: &RpcRequest) -> Result<Option<Value>, super::types::RpcError>;
}

pub struct RpcPipeline {
    middlewares: Vec<Arc<dyn RpcMiddleware>>,
    client: Arc<RpcClient>,
}

impl RpcPipeline {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self {
            middlewares: Vec::new(),
            client,
        }
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn RpcMiddleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Run a request through the middlewares in order, forwarding to the
    /// node when none of them answers.
    pub async fn dispatch(&self, req: RpcRequest) -> RpcResponse {
        for middleware in &self.middlewares {
            match middleware.handle(&req).await {
                Ok(Some(result)) => {
                    log::debug!(
                        "[Rpc] {} answered {} locally",
                        middleware.name(),
                        req.method
                    );
                    return RpcResponse::result(req.id, result);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("[Rpc] {} failed on {}: {}", middleware.name(), req.method, e);
                    return RpcResponse::error(req.id, e);
                }
            }
        }

        match self.client.request(&req.method, req.params.clone()).await {
            Ok(result) => RpcResponse::result(req.id, result),
            Err(e) => RpcResponse::error(req.id, e),
        }
    }
}
