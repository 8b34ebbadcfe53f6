//! Vendor media type version negotiation.
//!
//! Clients select an API version with an `Accept` header such as
//! `application/vnd.marketplace.v1` (optionally `+json` and parameters).
//! Anything else resolves to the configured default; negotiation never
//! rejects a request.

use std::fmt;

/// A routing namespace, rendered as the `/v{N}` path prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(u32);

impl ApiVersion {
    pub const V1: ApiVersion = ApiVersion(1);

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn path_prefix(&self) -> String {
        format!("/v{}", self.0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNegotiator {
    /// `application/vnd.{vendor}.v`
    prefix: String,
    default: ApiVersion,
    registered: Vec<ApiVersion>,
}

impl VersionNegotiator {
    /// Versions with a mounted route namespace.
    pub const REGISTERED: &'static [ApiVersion] = &[ApiVersion::V1];

    /// A default that is not registered is replaced by the lowest registered
    /// version.
    pub fn new(vendor: &str, default_version: u32) -> Self {
        let registered = Self::REGISTERED.to_vec();
        let requested = ApiVersion(default_version);
        let default = if registered.contains(&requested) {
            requested
        } else {
            tracing::warn!(
                requested = default_version,
                "default API version has no routes; using {}",
                ApiVersion::V1
            );
            ApiVersion::V1
        };

        Self {
            prefix: format!("application/vnd.{}.v", vendor.trim().to_ascii_lowercase()),
            default,
            registered,
        }
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default
    }

    pub fn registered(&self) -> &[ApiVersion] {
        &self.registered
    }

    /// Pick the version for a request's `Accept` header.
    ///
    /// The first media range naming this vendor decides. Unknown versions and
    /// headers without a vendor range resolve to the default.
    pub fn negotiate(&self, accept: Option<&str>) -> ApiVersion {
        let Some(accept) = accept else {
            return self.default;
        };

        let requested = accept.split(',').find_map(|range| self.vendor_version(range));
        match requested {
            Some(version) if self.registered.contains(&version) => version,
            _ => self.default,
        }
    }

    fn vendor_version(&self, range: &str) -> Option<ApiVersion> {
        let media_type = range.split(';').next()?.trim().to_ascii_lowercase();
        let rest = media_type.strip_prefix(&self.prefix)?;
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);
        if !(suffix.is_empty() || suffix == "+json") {
            return None;
        }
        digits.parse::<u32>().ok().map(ApiVersion)
    }
}

impl Default for VersionNegotiator {
    fn default() -> Self {
        Self::new("marketplace", 1)
    }
}
