//! Compile-time backend selection.
//!
//! The `cloud` feature binds the facade to the job-table backend; without it
//! the legacy backend is bound. The backend that is not selected is not
//! compiled into the library at all, so nothing can reach it at runtime.

use crate::models::Backend;

#[cfg(feature = "cloud")]
pub(crate) type Active = crate::jobs::JobTableBackend;

#[cfg(not(feature = "cloud"))]
pub(crate) type Active = crate::legacy::LegacyBackend;

/// Backend bound into this build, for diagnostics only.
pub const ACTIVE_BACKEND: Backend = <Active as crate::fetcher::ListFetcher>::BACKEND;

#[cfg(test)]
mod tests {
    use super::ACTIVE_BACKEND;
    use crate::models::Backend;

    #[test]
    fn active_backend_follows_cloud_feature() {
        let expected = if cfg!(feature = "cloud") {
            Backend::JobTable
        } else {
            Backend::Legacy
        };
        assert_eq!(ACTIVE_BACKEND, expected);
    }
}
