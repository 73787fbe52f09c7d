use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal request executor so HTTP access can be wrapped (auth) or faked.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
