//! HTTP object store.
//!
//! ```text
//! HEAD {endpoint}/{bucket}          connect
//! HEAD {endpoint}/{bucket}/{key}    exists (404 => false)
//! PUT  {endpoint}/{bucket}/{key}    put, headers from the HeaderSet
//! ```
//!
//! One pooled agent serves every worker thread.

use std::time::Duration;

use url::Url;

use super::{ObjectStore, StoreConnector, StoreError};
use crate::asset::HeaderSet;
use crate::config::{ConfigError, StoreConfig};
use crate::debug;

/// Connection parameters for an HTTP store.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    bucket_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(
        endpoint: &str,
        bucket: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut bucket_url = Url::parse(endpoint).map_err(|e| {
            ConfigError::Validation(format!("store.endpoint `{endpoint}`: {e}"))
        })?;
        bucket_url
            .path_segments_mut()
            .map_err(|()| ConfigError::Validation(format!("store.endpoint `{endpoint}` cannot be a base URL")))?
            .pop_if_empty()
            .push(bucket);

        Ok(Self {
            bucket_url,
            token,
            timeout,
        })
    }

    /// Connector described by the `[store]` section.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let (endpoint, bucket) = config.require_target()?;
        Self::new(endpoint, bucket, config.token()?, config.timeout())
    }
}

impl StoreConnector for HttpConnector {
    type Store = HttpStore;

    fn connect(&self) -> Result<HttpStore, StoreError> {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        let store = HttpStore {
            agent: config.into(),
            bucket_url: self.bucket_url.clone(),
            token: self.token.clone(),
        };

        debug!("store"; "connecting to {}", store.bucket_url);
        store
            .authorized(store.agent.head(store.bucket_url.as_str()))
            .call()
            .map_err(|e| map_ureq_error(store.bucket_url.as_str(), &e))?;
        Ok(store)
    }
}

/// Connected HTTP store session.
pub struct HttpStore {
    agent: ureq::Agent,
    bucket_url: Url,
    token: Option<String>,
}

impl HttpStore {
    /// URL of an object; every key segment is percent-encoded.
    fn object_url(&self, key: &str) -> Url {
        let mut url = self.bucket_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(key.split('/'));
        }
        url
    }

    fn authorized<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.token {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

impl ObjectStore for HttpStore {
    fn put(&self, key: &str, body: &[u8], headers: &HeaderSet) -> Result<(), StoreError> {
        let url = self.object_url(key);
        let mut request = self.authorized(self.agent.put(url.as_str()));
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        request.send(body).map_err(|e| map_ureq_error(key, &e))?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let url = self.object_url(key);
        match self.authorized(self.agent.head(url.as_str())).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::StatusCode(404)) => Ok(false),
            Err(e) => Err(map_ureq_error(key, &e)),
        }
    }
}

/// Map a ureq error to a [`StoreError`].
fn map_ureq_error(key: &str, err: &ureq::Error) -> StoreError {
    match err {
        ureq::Error::StatusCode(code @ (401 | 403)) => StoreError::Unauthorized(*code),
        ureq::Error::StatusCode(code) => StoreError::Status {
            key: key.to_owned(),
            code: *code,
        },
        ureq::Error::Timeout(_) => StoreError::Timeout(err.to_string()),
        other => StoreError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(endpoint: &str) -> HttpConnector {
        HttpConnector::new(endpoint, "my-assets", None, Duration::from_secs(1)).unwrap()
    }

    fn store(endpoint: &str) -> HttpStore {
        let c = connector(endpoint);
        HttpStore {
            agent: ureq::Agent::new_with_defaults(),
            bucket_url: c.bucket_url,
            token: None,
        }
    }

    #[test]
    fn test_bucket_url() {
        assert_eq!(
            connector("https://s3.example.com").bucket_url.as_str(),
            "https://s3.example.com/my-assets"
        );
        assert_eq!(
            connector("https://s3.example.com/base/").bucket_url.as_str(),
            "https://s3.example.com/base/my-assets"
        );
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let store = store("https://s3.example.com");
        assert_eq!(
            store.object_url("images/logo-id-00ff.png").as_str(),
            "https://s3.example.com/my-assets/images/logo-id-00ff.png"
        );
        assert_eq!(
            store.object_url("images/my logo.png").as_str(),
            "https://s3.example.com/my-assets/images/my%20logo.png"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = HttpConnector::new("not a url", "b", None, Duration::from_secs(1));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_map_ureq_error() {
        assert!(matches!(
            map_ureq_error("k", &ureq::Error::StatusCode(403)),
            StoreError::Unauthorized(403)
        ));
        assert!(matches!(
            map_ureq_error("k", &ureq::Error::StatusCode(500)),
            StoreError::Status { code: 500, .. }
        ));
        assert!(matches!(
            map_ureq_error("k", &ureq::Error::ConnectionFailed),
            StoreError::Transport(_)
        ));
    }

    #[test]
    fn test_connect_failure_is_error() {
        // Nothing listens on port 9 of localhost.
        let c = HttpConnector::new("http://127.0.0.1:9", "b", None, Duration::from_secs(2)).unwrap();
        assert!(c.connect().is_err());
    }
}
