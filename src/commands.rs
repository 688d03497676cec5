pub mod build;
pub mod install;
pub mod recover;
pub mod validate;

use crate::models::error::PackError;
use crate::models::task_status::TaskStatus;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Status channel for one background task. Events are logged as they arrive; the
/// returned handle completes once every sender is dropped.
pub fn status_channel() -> (UnboundedSender<TaskStatus>, JoinHandle<()>) {
    let (tx, mut rx) = unbounded_channel::<TaskStatus>();
    let printer = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            info!("{status}");
        }
    });
    (tx, printer)
}

/// Waits until `printer` has logged every event, then hands back the task's result.
pub async fn settle<T>(result: Result<T, PackError>, printer: JoinHandle<()>) -> Result<T, PackError> {
    if let Err(e) = printer.await {
        warn!("status printer failed: {e}");
    }
    result
}
