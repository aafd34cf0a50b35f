//! Response headers attached to published objects.

use std::collections::BTreeMap;

use crate::config::PublishConfig;
use crate::utils::date::http_date_after;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const EXPIRES: &str = "Expires";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACL: &str = "x-amz-acl";

/// Header name → value, ordered for deterministic requests and logs.
///
/// Names are case-insensitive: inserting `cache-control` replaces
/// `Cache-Control`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.0.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.0.insert(name, value.into());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

}

/// Fixed cache policy shared by every asset of one run.
///
/// `Expires` is computed once when the policy is built so all objects of a
/// run carry the same date.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    base: HeaderSet,
}

impl HeaderPolicy {
    pub fn from_config(config: &PublishConfig) -> Self {
        let mut base = HeaderSet::new();
        base.insert(CACHE_CONTROL, config.cache_control.clone());
        base.insert(EXPIRES, http_date_after(config.expires_secs));
        if let Some(acl) = &config.acl {
            base.insert(ACL, acl.clone());
        }
        for (name, value) in &config.headers {
            base.insert(name.clone(), value.clone());
        }
        Self { base }
    }

    /// Headers for one asset: the fixed policy plus its content type.
    ///
    /// A content type configured in the extra headers wins.
    pub fn for_mime(&self, mime: &str) -> HeaderSet {
        let mut headers = self.base.clone();
        if headers.get(CONTENT_TYPE).is_none() {
            headers.insert(CONTENT_TYPE, mime);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mime;

    #[test]
    fn test_header_set_case_insensitive() {
        let mut h = HeaderSet::new();
        h.insert("Cache-Control", "max-age=1");
        h.insert("cache-control", "max-age=2");
        assert_eq!(h.iter().count(), 1);
        assert_eq!(h.get("CACHE-CONTROL"), Some("max-age=2"));
    }

    #[test]
    fn test_default_policy() {
        let policy = HeaderPolicy::from_config(&PublishConfig::default());
        let h = policy.for_mime(mime::types::CSS);

        assert_eq!(h.get(CACHE_CONTROL), Some("max-age=315360000"));
        assert_eq!(h.get(CONTENT_TYPE), Some(mime::types::CSS));
        assert_eq!(h.get(ACL), Some("public-read"));

        let expires = h.get(EXPIRES).unwrap();
        assert!(expires.ends_with(" GMT"));
        assert_eq!(expires.split(' ').count(), 6);
    }

    #[test]
    fn test_extra_headers_override() {
        let mut config = PublishConfig::default();
        config.acl = None;
        config
            .headers
            .insert("cache-control".into(), "public, max-age=60".into());
        config.headers.insert("X-Origin".into(), "asset-id".into());

        let h = HeaderPolicy::from_config(&config).for_mime("image/png");
        assert_eq!(h.get(CACHE_CONTROL), Some("public, max-age=60"));
        assert_eq!(h.get("x-origin"), Some("asset-id"));
        assert_eq!(h.get(ACL), None);
        assert_eq!(h.get(CONTENT_TYPE), Some("image/png"));
    }
}
