use crate::config::global::{load_config, save_config};
use crate::core::backup::list_recovery_units;
use crate::core::recovery::{self, RecoveryReport};
use crate::core::target::Target;
use crate::models::error::PackError;
use crate::models::mod_dto::RecoveryUnit;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use camino::Utf8PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument};

#[instrument(skip(channel))]
pub async fn recover(
    target: Utf8PathBuf,
    unit: Option<Utf8PathBuf>,
    channel: UnboundedSender<TaskStatus>,
) -> Result<RecoveryReport, PackError> {
    info!("Starting task recover");

    TaskContext::provide(channel, move || {
        TaskContext::report(TaskStatus::Started(format!("recover {target}")));

        let mut target = Target::open(&target)?;
        let report = recovery::recover(&mut target, unit.as_deref())?;

        let mut config = load_config();
        config.remember(&target.root);
        save_config(&config);

        TaskContext::report(TaskStatus::Finished);
        Ok(report)
    })
    .await?
}

/// Recovery units of a target, newest first.
#[instrument]
pub fn backups(target: &Utf8PathBuf) -> Result<Vec<RecoveryUnit>, PackError> {
    let target = Target::open(target)?;
    list_recovery_units(target.registry.as_ref())
}

/// The unit `recover` would pick, for the confirmation prompt.
pub fn pending_unit(target: &Utf8PathBuf, unit: Option<&Utf8PathBuf>) -> Result<Utf8PathBuf, PackError> {
    let target = Target::open(target)?;
    recovery::resolve_unit(&target, unit.map(|u| u.as_path()))
}
