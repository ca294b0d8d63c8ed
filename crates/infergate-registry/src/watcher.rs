//! Polling watcher for the model definition directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use infergate_core::SnapshotRegistry;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::loader::{RegistryError, definition_files, load_snapshot};

/// Identity of the definition files at one point in time.
type Fingerprint = Vec<(PathBuf, Option<SystemTime>, u64)>;

fn fingerprint(dir: &Path) -> Option<Fingerprint> {
    let files = definition_files(dir).ok()?;
    Some(
        files
            .into_iter()
            .map(|path| {
                let meta = std::fs::metadata(&path).ok();
                let modified = meta.as_ref().and_then(|m| m.modified().ok());
                let len = meta.map_or(0, |m| m.len());
                (path, modified, len)
            })
            .collect(),
    )
}

/// Republishes the registry whenever the definition files change.
///
/// The change baseline is captured when the watcher is created, so any
/// write after [`RegistryWatcher::new`] is picked up by the first poll.
/// A reload that fails to parse is logged and the previous snapshot
/// stays in place; the next change triggers another attempt.
pub struct RegistryWatcher {
    dir: PathBuf,
    registry: Arc<SnapshotRegistry>,
    poll_interval: Duration,
    cancel_token: CancellationToken,
    baseline: Option<Fingerprint>,
}

impl RegistryWatcher {
    /// Create a new watcher.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding the `*.toml` definitions
    /// * `registry` - Registry to publish reloaded snapshots into
    /// * `poll_interval` - How often to check for changes
    /// * `cancel_token` - Token to signal watcher shutdown
    pub fn new(
        dir: impl Into<PathBuf>,
        registry: Arc<SnapshotRegistry>,
        poll_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        let dir = dir.into();
        let baseline = fingerprint(&dir);
        Self {
            dir,
            registry,
            poll_interval,
            cancel_token,
            baseline,
        }
    }

    /// Load the definitions and publish them as the first snapshot.
    ///
    /// Call after [`RegistryWatcher::new`]: a file changed in between is
    /// reloaded again by the first poll rather than missed.
    pub fn load_initial(&self) -> Result<usize, RegistryError> {
        let snapshot = load_snapshot(&self.dir)?;
        let count = snapshot.len();
        self.registry.publish(snapshot);
        Ok(count)
    }

    /// Run the watcher on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Poll until cancelled.
    pub async fn run(mut self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last = self.baseline.take();
        info!(dir = %self.dir.display(), "Watching model definitions");

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!("Model definition watcher stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let current = fingerprint(&self.dir);
                    if current == last {
                        continue;
                    }
                    last = current;
                    self.reload().await;
                }
            }
        }
    }

    async fn reload(&self) {
        info!(dir = %self.dir.display(), "Model definitions changed, reloading");
        let dir = self.dir.clone();
        match tokio::task::spawn_blocking(move || load_snapshot(&dir)).await {
            Ok(Ok(snapshot)) => self.registry.publish(snapshot),
            Ok(Err(e)) => {
                error!(error = %e, "Failed to reload model definitions, keeping previous registry");
            }
            Err(e) => warn!(error = %e, "Model definition reload task failed"),
        }
    }
}
