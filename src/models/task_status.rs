use derive_more::Display;
use serde::{Deserialize, Serialize};

/// States of one install run.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum InstallState {
    Idle,
    #[display("backing up")]
    BackingUp,
    #[display("applying policy")]
    ApplyingPolicy,
    Finalizing,
    Done,
    Failed,
}

/// Progress events published by a background task.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Display)]
pub enum TaskStatus {
    #[display("started {_0}")]
    Started(String),
    #[display("state: {_0}")]
    State(InstallState),
    #[display("{_0}")]
    Step(String),
    #[display("finished")]
    Finished,
}
