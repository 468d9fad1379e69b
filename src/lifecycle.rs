//! Lifecycle Module
//!
//! Startup-time duties of the proxy, run once before serving:
//! install preloads the fallback image, activate garbage-collects buckets
//! left behind by earlier cache versions.

use tracing::{info, warn};

use crate::cache::{BucketKind, CachedImage};
use crate::proxy::AppState;
use crate::upstream::OutboundRequest;

// == Install ==
/// Preloads the fallback image into the fallback bucket.
///
/// Best-effort: a failed preload is logged and startup continues. Until a
/// later request happens to repopulate it, origin outages then surface as
/// failed image loads instead of the fallback.
pub async fn install(state: &AppState) {
    match state
        .upstream
        .send(OutboundRequest::get(&state.fallback_asset))
        .await
    {
        Ok(response) if response.is_cacheable() => {
            let entry = CachedImage::new(response.body, response.content_type);
            let mut store = state.store.write().await;
            store.insert(BucketKind::Fallback, state.fallback_asset.clone(), entry);
            info!(asset = %state.fallback_asset, "fallback image preloaded");
        }
        Ok(response) => {
            warn!(
                asset = %state.fallback_asset,
                status = response.status,
                "fallback preload got a non-200 response, continuing without it"
            );
        }
        Err(err) => {
            warn!(
                asset = %state.fallback_asset,
                error = %err,
                "fallback preload failed, continuing without it"
            );
        }
    }
}

// == Activate ==
/// Deletes every bucket that does not belong to the current cache version.
///
/// Bucket names carry the version tag, so this is the whole migration
/// story: bump the tag and the old generation disappears here.
pub async fn activate(state: &AppState) -> Vec<String> {
    let mut store = state.store.write().await;
    let purged = store.purge_stale_buckets();
    if purged.is_empty() {
        info!(version = store.version(), "cache activation: no stale buckets");
    } else {
        info!(
            version = store.version(),
            purged = purged.len(),
            "cache activation: purged stale buckets"
        );
    }
    purged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::cache::TieredStore;
    use crate::upstream::{Upstream, UpstreamError, UpstreamResponse};

    struct SvgUpstream;

    #[async_trait]
    impl Upstream for SvgUpstream {
        async fn send(&self, req: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
            assert_eq!(req.path_and_query, "/assets/fallback-image.svg");
            Ok(UpstreamResponse {
                status: 200,
                content_type: Some("image/svg+xml".into()),
                body: Bytes::from_static(b"<svg/>"),
            })
        }
    }

    struct DownUpstream;

    #[async_trait]
    impl Upstream for DownUpstream {
        async fn send(&self, _req: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
            Err(UpstreamError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_install_preloads_fallback() {
        let state = AppState::new(
            TieredStore::new("v1"),
            Arc::new(SvgUpstream),
            "/assets/fallback-image.svg",
        );

        install(&state).await;

        let store = state.store.read().await;
        let entry = store
            .peek(BucketKind::Fallback, "/assets/fallback-image.svg")
            .expect("fallback should be cached");
        assert_eq!(entry.body.as_ref(), b"<svg/>");
    }

    #[tokio::test]
    async fn test_install_failure_is_non_fatal() {
        let state = AppState::new(
            TieredStore::new("v1"),
            Arc::new(DownUpstream),
            "/assets/fallback-image.svg",
        );

        // Must not panic or error; the bucket just stays empty
        install(&state).await;

        let store = state.store.read().await;
        assert_eq!(store.bucket_len(BucketKind::Fallback), 0);
    }

    #[tokio::test]
    async fn test_activate_purges_previous_version() {
        let mut store = TieredStore::new("v2");
        store.seed_named(
            "tiercache-critical-v1",
            "/logo.svg".into(),
            CachedImage::new(Bytes::from_static(b"old"), None),
        );
        store.seed_named(
            "tiercache-characters-v1",
            "/characters/a.png".into(),
            CachedImage::new(Bytes::from_static(b"old"), None),
        );

        let state = AppState::new(store, Arc::new(DownUpstream), "/assets/fallback-image.svg");

        let mut purged = activate(&state).await;
        purged.sort();

        assert_eq!(
            purged,
            vec!["tiercache-characters-v1", "tiercache-critical-v1"]
        );
        let store = state.store.read().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_activate_keeps_current_version() {
        let mut store = TieredStore::new("v1");
        store.insert(
            BucketKind::Critical,
            "/logo.svg".into(),
            CachedImage::new(Bytes::from_static(b"new"), None),
        );

        let state = AppState::new(store, Arc::new(DownUpstream), "/assets/fallback-image.svg");

        let purged = activate(&state).await;

        assert!(purged.is_empty());
        let store = state.store.read().await;
        assert_eq!(store.bucket_len(BucketKind::Critical), 1);
    }
}
