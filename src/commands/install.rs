use crate::config::global::{load_config, save_config};
use crate::core::backup::{BackupSink, KeepInPlace, MoveToDir};
use crate::core::installer::{self, InstallReport};
use crate::core::pack_reader::read_pack;
use crate::core::target::Target;
use crate::models::error::PackError;
use crate::models::pack::PackType;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use camino::Utf8PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub archive: Utf8PathBuf,
    pub target: Utf8PathBuf,
    /// Replaces the pack's own policy before the run starts.
    pub policy: Option<PackType>,
    pub backup_dir: Option<Utf8PathBuf>,
}

#[instrument(skip(channel))]
pub async fn install(
    request: InstallRequest,
    channel: UnboundedSender<TaskStatus>,
) -> Result<InstallReport, PackError> {
    info!("Starting task install");

    TaskContext::provide(channel, move || {
        TaskContext::report(TaskStatus::Started(format!("install {}", request.archive)));

        let mut opened = read_pack(&request.archive)?;
        if let Some(policy) = request.policy {
            debug!("policy {} replaced by {policy}", opened.model.pack_type);
            opened.model.pack_type = policy;
        }

        let mut target = Target::open(&request.target)?;
        let mut sink: Box<dyn BackupSink> = match request.backup_dir {
            Some(dir) => Box::new(MoveToDir(dir)),
            None => Box::new(KeepInPlace),
        };

        let report = installer::install(&opened, &mut target, sink.as_mut())?;

        let mut config = load_config();
        config.remember(&target.root);
        save_config(&config);

        TaskContext::report(TaskStatus::Finished);
        Ok(report)
    })
    .await?
}
