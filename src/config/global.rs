use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MAX_KNOWN_TARGETS: usize = 10;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct GlobalConfig {
    pub last_target: Option<Utf8PathBuf>,
    /// Most recently used first.
    pub known_targets: Vec<Utf8PathBuf>,
}

impl GlobalConfig {
    /// Moves `target` to the front of the MRU list.
    pub fn remember(&mut self, target: &Utf8Path) {
        self.known_targets.retain(|t| t != target);
        self.known_targets.insert(0, target.to_owned());
        self.known_targets.truncate(MAX_KNOWN_TARGETS);
        self.last_target = Some(target.to_owned());
    }
}

pub fn load_config() -> GlobalConfig {
    confy::load("mod_packer", "targets").unwrap_or_default()
}

pub fn save_config(config: &GlobalConfig) {
    if let Err(e) = confy::store("mod_packer", "targets", config) {
        warn!("failed to save target history: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_keeps_most_recent_first_without_duplicates() {
        let mut config = GlobalConfig::default();
        config.remember(Utf8Path::new("/a"));
        config.remember(Utf8Path::new("/b"));
        config.remember(Utf8Path::new("/a"));

        assert_eq!(config.known_targets, [Utf8PathBuf::from("/a"), Utf8PathBuf::from("/b")]);
        assert_eq!(config.last_target.as_deref(), Some(Utf8Path::new("/a")));

        for i in 0..20 {
            config.remember(Utf8Path::new(&format!("/t{i}")));
        }
        assert_eq!(config.known_targets.len(), MAX_KNOWN_TARGETS);
        assert_eq!(config.known_targets[0], "/t19");
    }
}
