use crate::core::pack_builder;
use crate::models::error::PackError;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use camino::Utf8PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

#[instrument(skip(channel))]
pub async fn build(
    source: Utf8PathBuf,
    output: Utf8PathBuf,
    channel: UnboundedSender<TaskStatus>,
) -> Result<Utf8PathBuf, PackError> {
    info!("Starting task build");

    TaskContext::provide(channel, move || {
        TaskContext::report(TaskStatus::Started(format!("build {source}")));

        let model = pack_builder::load_descriptor(&source)?;
        debug!("pack {} has {} members", model.effective_name(), model.mods().len());

        let written = pack_builder::gen_file(&model, &output)?;
        TaskContext::report(TaskStatus::Finished);
        Ok(written)
    })
    .await?
}
