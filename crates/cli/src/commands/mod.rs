//! CLI command implementations.

pub mod cart;
pub mod checkout;

use std::sync::Arc;
use std::time::Duration;

use shopfront_storefront::checkout::SimulatedSubmitter;
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::notify::RecordingNotifier;
use shopfront_storefront::session::Session;
use shopfront_storefront::storage::FileStorage;

/// Session type used by every command.
pub type CliSession = Session<FileStorage, SimulatedSubmitter>;

/// Open a session over the configured data directory.
///
/// Notices are collected rather than logged so the command can print them
/// after the action completes.
pub fn open_session(
    config: &StorefrontConfig,
    submit_delay: Option<Duration>,
) -> (CliSession, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let submitter = SimulatedSubmitter::new(submit_delay.unwrap_or(config.submit_delay));
    let storage = FileStorage::new(config.data_dir.clone());

    tracing::debug!(data_dir = %config.data_dir.display(), "Opening session");
    let session = Session::new(storage, submitter, notifier.clone());
    (session, notifier)
}
