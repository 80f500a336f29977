//! Command line and environment configuration
//!

use std::path::PathBuf;

use clap::Parser;

pub fn db_path_default() -> PathBuf {
    shellexpand::tilde("~/.cache/todo-app.sqlite3").to_string().into()
}

pub fn blob_path_default() -> PathBuf {
    shellexpand::tilde("~/.cache/todo-app-blobs").to_string().into()
}

fn expand_path(value: &str) -> Result<PathBuf, String> {
    Ok(shellexpand::tilde(value).to_string().into())
}

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct CliOpts {
    #[clap(long, help = "Path to the database file", env = "TODO_APP_DB_PATH", value_parser = expand_path)]
    pub db_path: Option<PathBuf>,

    #[clap(long, help = "Directory for uploaded files", env = "TODO_APP_BLOB_PATH", value_parser = expand_path)]
    pub blob_path: Option<PathBuf>,

    #[clap(
        long,
        help = "Keep uploaded files in memory, they are lost on restart",
        env = "TODO_APP_MEMORY_BLOBS"
    )]
    pub memory_blobs: bool,

    #[clap(
        long,
        help = "Origin allowed to make cross-origin requests, any origin if unset",
        env = "TODO_APP_CORS_ORIGIN"
    )]
    pub cors_origin: Option<String>,

    #[clap(
        long,
        help = "Deployment stage name",
        env = "TODO_APP_STAGE",
        default_value = "development"
    )]
    pub stage: String,

    #[clap(long, env = "TODO_APP_LISTEN_ADDR", default_value = "127.0.0.1")]
    pub listen_addr: String,

    #[clap(long, env = "TODO_APP_PORT", default_value_t = 8189)]
    pub port: u16,

    #[clap(long, help = "Enable debug logging")]
    pub debug: bool,
}

impl CliOpts {
    pub fn as_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }

    pub fn as_url(&self) -> String {
        format!("http://{}", self.as_addr())
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(db_path_default)
    }

    pub fn blob_path(&self) -> PathBuf {
        self.blob_path.clone().unwrap_or_else(blob_path_default)
    }
}
