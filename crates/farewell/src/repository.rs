use anyhow::Result;
use farewell_config::FarewellConfig;
use farewell_store::{
    Collection, JsonBinClient, LocalRepository, OfflineRemote, ReconcilingRepository, RemoteSync,
    RetryPolicy,
};
use tracing::{debug, info};

/// Build the repository for this run.
///
/// Without a usable remote the fetch is attempted once, so an offline run
/// does not sit through the retry delays.
pub(crate) fn open_repository(
    config: &FarewellConfig,
    offline: bool,
) -> Result<ReconcilingRepository> {
    let local = LocalRepository::new(config.cache.resolved_dir());

    let (remote, retry): (Box<dyn Collection>, RetryPolicy) = if offline {
        info!("offline mode, using local cache only");
        (Box::new(OfflineRemote), RetryPolicy::once())
    } else if !config.remote.is_usable() {
        debug!("remote store not configured (bin_id/api_key), using local cache only");
        (Box::new(OfflineRemote), RetryPolicy::once())
    } else {
        (
            Box::new(JsonBinClient::from_config(&config.remote)?),
            RetryPolicy::from_config(&config.retry),
        )
    };

    Ok(ReconcilingRepository::new(local, remote)
        .with_retry(retry)
        .with_rules(config.images.shape_rules()))
}

/// Short status word for the remote half of a write.
pub(crate) fn remote_status(sync: &RemoteSync) -> &'static str {
    match sync {
        RemoteSync::Synced => "synced",
        RemoteSync::NotFound => "not-found",
        RemoteSync::Skipped => "skipped",
        RemoteSync::LocalOnly(_) => "local-only",
    }
}

/// Tell the user when a change did not reach everywhere it should.
pub(crate) fn warn_if_partial(repo: &ReconcilingRepository, sync: &RemoteSync) {
    if let RemoteSync::LocalOnly(error) = sync {
        eprintln!("Warning: saved on this device only; remote sync failed: {error}");
    }
    if repo.local().is_degraded() {
        eprintln!("Warning: local cache is not writable; the change lasts only for this run.");
    }
}
