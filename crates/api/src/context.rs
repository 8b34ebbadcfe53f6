//! Per-request context inserted by middleware.
//!
//! Controllers read these as request extensions; nothing here is global.

use axum::http::Method;

use marketplace_auth::Access;

pub use crate::versioning::ApiVersion;
pub use marketplace_auth::Identity;

/// Safe methods may proceed anonymously; everything else needs a token holder.
pub fn access_for(method: &Method) -> Access {
    if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
        Access::Read
    } else {
        Access::Write
    }
}
