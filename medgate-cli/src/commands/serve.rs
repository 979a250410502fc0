//! `medgate serve`

use anyhow::{Context, Result};
use medgate_core::app::MedgateServerBuilder;
use medgate_core::config::{MedgateConfig, DEFAULT_CONFIG_FILE};
use medgate_core::rbac::{MemoryUserDirectory, UserRecord};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

fn load_users(path: &Path) -> Result<Vec<UserRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read users file: {}", path.display()))?;
    let file: UsersFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse users file: {}", path.display()))?;
    Ok(file.users)
}

fn init_logging(config: &MedgateConfig, explicit: bool) -> Result<()> {
    if explicit {
        medgate_core::logging::init_logging(&config.logging)
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        Ok(())
    }
}

pub fn run(config_path: Option<&Path>, users: &Path, port: Option<u16>) -> Result<()> {
    let explicit = config_path.is_some() || Path::new(DEFAULT_CONFIG_FILE).exists();
    let config = MedgateConfig::load_from(config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE)))?;
    init_logging(&config, explicit)?;

    let users = load_users(users)?;
    log::info!("Loaded {} users", users.len());

    let mut builder = MedgateServerBuilder::with_config(config)
        .with_directory(Arc::new(MemoryUserDirectory::with_users(users)));
    if let Some(port) = port {
        builder = builder.with_port(port);
    }
    let server = builder.build()?;

    tokio::runtime::Runtime::new()
        .context("Failed to start the tokio runtime")?
        .block_on(server.serve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn users_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[users]]
            id = "u-1"
            role = "doctor"

            [[users]]
            id = "u-2"
            role = "technician"
            display_name = "Sam"
            "#
        )
        .unwrap();

        let users = load_users(file.path()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].display_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn missing_users_file_is_an_error() {
        assert!(load_users(Path::new("/nonexistent/users.toml")).is_err());
    }
}
