use crate::core::pack_reader::{self, read_pack};
use crate::core::validator;
use crate::models::error::PackError;
use crate::models::manifest::PackManifest;
use crate::models::pack::FileEntry;
use crate::models::status::PackStatus;
use crate::models::task_status::TaskStatus;
use crate::utils::context::TaskContext;
use camino::Utf8PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub manifest: PackManifest,
    pub status: PackStatus,
    pub unmet: Vec<String>,
    /// `{to}/{file name}` of every bundled file, sorted by file name.
    pub files: Vec<String>,
}

impl ValidationReport {
    /// The error `validate` exits with, if any.
    pub fn outcome(&self) -> Result<(), PackError> {
        if self.status.is_correct() {
            Ok(())
        } else if self.status.bits() == PackStatus::MODS_DEPEND_INVALID {
            Err(PackError::Dependency(self.unmet.clone()))
        } else {
            Err(PackError::Validation(self.status))
        }
    }
}

/// Opens a pack archive and checks the model it describes.
#[instrument(skip(channel))]
pub async fn validate(
    archive: Utf8PathBuf,
    channel: UnboundedSender<TaskStatus>,
) -> Result<ValidationReport, PackError> {
    info!("Starting task validate");

    TaskContext::provide(channel, move || {
        TaskContext::report(TaskStatus::Started(format!("validate {archive}")));
        let opened = read_pack(&archive)?;
        let report = ValidationReport {
            status: validator::check(&opened.model),
            unmet: validator::unmet_dependencies(&opened.model),
            files: opened
                .model
                .display_order()
                .iter()
                .map(|e| destination_label(e))
                .collect(),
            manifest: opened.manifest,
        };
        TaskContext::report(TaskStatus::Finished);
        Ok(report)
    })
    .await?
}

fn destination_label(entry: &FileEntry) -> String {
    match entry.to.as_deref().filter(|to| !to.is_empty()) {
        Some(to) => format!("{to}/{}", entry.file_name()),
        None => entry.file_name().to_string(),
    }
}

/// Decodes the manifest only; members are not extracted.
#[instrument]
pub fn info(archive: &Utf8PathBuf) -> Result<PackManifest, PackError> {
    pack_reader::read_manifest(archive)
}
