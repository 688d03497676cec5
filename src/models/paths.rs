use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Entry names inside a pack archive.
define_paths!(PackLayout {
    manifest: "mod.json",
    manifest_hjson: "mod.hjson",
    icon: "icon.png",
    mods: "mods",
    assets: "assets",
    backfiles: "backfiles",
});

// Well-known locations under a target data root.
define_paths!(TargetPaths {
    mods: "mods",
    settings: "settings.toml",
    lock: ".modpack.lock",
    cache: "cache",
});

// Authoring directory consumed by `pack build`.
define_paths!(SourcePaths {
    descriptor: "pack.toml",
});

impl PackLayout {
    /// Archive entry name for a path under one of the layout's directories.
    pub fn entry(dir: &Utf8Path, rel: &Utf8Path) -> String {
        let joined = dir.join(rel);
        joined.as_str().replace('\\', "/")
    }
}

/// Suffix marking a disabled mod in a mods directory.
pub const DISABLED_SUFFIX: &str = ".disabled";
