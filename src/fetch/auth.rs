use crate::fetch::client::HttpClient;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <key>` on
/// every request.
pub struct BearerAuth<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> BearerAuth<C> {
    /// Fails if the key contains characters not allowed in a header value.
    pub fn new(inner: C, key: &str) -> anyhow::Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
            .context("API key is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }

    fn authorize(&self, req: &mut reqwest::Request) {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.authorize(&mut req);
        self.inner.execute(req).await
    }
}
