use crate::models::error::PackError;
use crate::models::task_status::TaskStatus;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::spawn_blocking;
use tokio::task_local;

task_local! {
     static CHANNEL: UnboundedSender<TaskStatus>;
}

pub struct TaskContext;

impl TaskContext {
    /// Runs `f` on the blocking pool with `channel` as its status sink.
    pub async fn provide<F, R>(channel: UnboundedSender<TaskStatus>, f: F) -> Result<R, PackError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        spawn_blocking(move || CHANNEL.sync_scope(channel, f))
            .await
            .map_err(|e| PackError::AsyncRuntimeError(e.to_string()))
    }

    pub fn emit(status: TaskStatus) -> Result<(), PackError> {
        CHANNEL
            .try_with(|c| {
                c.send(status)
                    .map_err(|e| PackError::AsyncRuntimeError(e.to_string()))
            })
            .unwrap_or_else(|_| Err(PackError::Unexpected(Some("no task context".into()))))
    }

    /// Like [`emit`](Self::emit), for library code that may run outside a task.
    pub fn report(status: TaskStatus) {
        let _ = Self::emit(status);
    }
}
