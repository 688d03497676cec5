pub mod commands;
pub mod config;

pub mod core {
    pub mod archive;
    pub mod backup;
    pub mod cache;
    pub mod installer;
    pub mod lock;
    pub mod manifest;
    pub mod pack_builder;
    pub mod pack_reader;
    pub mod recovery;
    pub mod registry;
    pub mod settings;
    pub mod target;
    pub mod validator;
}

pub mod models {
    pub mod descriptor;
    pub mod error;
    pub mod manifest;
    pub mod mod_dto;
    pub mod pack;
    pub mod paths;
    pub mod status;
    pub mod task_status;
}

pub mod utils {
    pub mod context;
    pub mod file;
    pub mod id;
    pub mod logging;
    pub mod path;
    pub mod snapshot;
    pub mod time;
    pub mod toml;
}
