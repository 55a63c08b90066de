use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared requests. Wrappers add auth on top of a base client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
