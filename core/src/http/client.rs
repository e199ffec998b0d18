use std::time::Duration;

use anyhow::Context;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, Proxy, Response};

use super::DEFAULT_USER_AGENT;

/// Thin wrapper over `reqwest::Client` carrying the timeout, proxy and
/// default headers the checker was configured with.
pub struct HttpClient {
    inner: Client,
    default_headers: HeaderMap,
    user_agent: String,
}

impl HttpClient {
    /// Builds the client. Malformed custom headers are skipped; an
    /// unparsable proxy URL is an error.
    pub fn new(
        timeout_seconds: u64,
        proxy_url: Option<&str>,
        custom_headers: &[(String, String)],
        user_agent: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut builder = ClientBuilder::new().timeout(Duration::from_secs(timeout_seconds));

        if let Some(proxy) = proxy_url {
            let p = Proxy::all(proxy).with_context(|| format!("invalid proxy url '{}'", proxy))?;
            builder = builder.proxy(p);
        }

        let inner = builder.build().context("failed to build http client")?;

        let mut default_headers = HeaderMap::new();
        for (key, val) in custom_headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(val),
            ) {
                (Ok(name), Ok(value)) => {
                    default_headers.insert(name, value);
                }
                _ => debug!("Skipping malformed header '{}'", key),
            }
        }

        Ok(Self {
            inner,
            default_headers,
            user_agent: user_agent.unwrap_or(DEFAULT_USER_AGENT).to_string(),
        })
    }

    /// Issues a single GET with the given query pairs. No retries.
    pub async fn get_with_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        let mut req = self.inner.get(url).query(query);

        // A User-Agent passed as a custom header wins over the configured one.
        if !self.default_headers.contains_key(USER_AGENT) {
            req = req.header(USER_AGENT, self.user_agent.as_str());
        }

        for (name, value) in self.default_headers.iter() {
            req = req.header(name, value);
        }

        req.send().await
    }

    /// User-Agent sent when no custom `User-Agent` header is configured.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults_user_agent() {
        let client = HttpClient::new(10, None, &[], None).unwrap();
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_client_skips_malformed_headers() {
        let headers = vec![
            ("X-Good".to_string(), "yes".to_string()),
            ("bad header".to_string(), "no".to_string()),
        ];
        let client = HttpClient::new(10, None, &headers, Some("custom/1.0")).unwrap();
        assert_eq!(client.default_headers.len(), 1);
        assert!(client.default_headers.contains_key("x-good"));
        assert_eq!(client.user_agent(), "custom/1.0");
    }
}
