use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Имя файла конфигурации рядом с исполняемым файлом
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Переменные окружения, перекрывающие значения из файла
pub const ENV_STORE_ID: &str = "CATALOG_SYNC_STORE_ID";
pub const ENV_TOKEN: &str = "CATALOG_SYNC_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Файл SQLite; относительный путь считается от каталога exe
    pub path: String,
}

/// Подключение к API удалённого магазина
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub store_id: String,
    /// Секретный токен; пустой: запросы без авторизации
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

const EMBEDDED_CONFIG: &str = r#"
[database]
path = "data/catalog.db"

[remote]
base_url = "https://app.ecwid.com/api/v3"
store_id = ""
token = ""
page_size = 100
timeout_secs = 30
"#;

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

/// Загрузить конфигурацию: `config.toml` рядом с exe, иначе встроенная.
/// Затем применяются переменные окружения.
pub fn load_config() -> anyhow::Result<Config> {
    let from_file = exe_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists());

    let mut config = match from_file {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            parse_file(&path)?
        }
        None => {
            tracing::info!("No {} next to the executable, using built-in defaults", CONFIG_FILE_NAME);
            toml::from_str(EMBEDDED_CONFIG)?
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Прочитать конфигурацию из явно указанного файла (+ переменные окружения)
pub fn load_from_path(path: &Path) -> anyhow::Result<Config> {
    let mut config = parse_file(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn parse_file(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(store_id) = lookup(ENV_STORE_ID).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("{} overrides remote.store_id", ENV_STORE_ID);
        config.remote.store_id = store_id;
    }
    if let Some(token) = lookup(ENV_TOKEN) {
        tracing::debug!("{} overrides remote.token", ENV_TOKEN);
        config.remote.token = token;
    }
}

/// Абсолютный путь к файлу базы
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let configured = Path::new(&config.database.path);
    if configured.is_absolute() {
        return Ok(configured.to_path_buf());
    }

    Ok(match exe_dir() {
        Some(dir) => dir.join(configured),
        None => configured.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn embedded() -> Config {
        toml::from_str(EMBEDDED_CONFIG).unwrap()
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = embedded();
        assert_eq!(config.database.path, "data/catalog.db");
        assert_eq!(config.remote.page_size, 100);
        assert!(config.remote.token.is_empty());
    }

    #[test]
    fn test_remote_defaults_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [database]
            path = "/tmp/x.db"

            [remote]
            base_url = "http://localhost"
            store_id = "42"
            "#
        )
        .unwrap();

        let config = parse_file(file.path()).unwrap();
        assert_eq!(config.remote.page_size, 100);
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.remote.store_id, "42");
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(parse_file(Path::new("/definitely/not/here/config.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = embedded();
        apply_env_overrides(&mut config, |key| match key {
            ENV_STORE_ID => Some("777".to_string()),
            ENV_TOKEN => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.remote.store_id, "777");
        assert_eq!(config.remote.token, "secret");
    }

    #[test]
    fn test_blank_store_id_env_ignored() {
        let mut config = embedded();
        config.remote.store_id = "42".to_string();
        apply_env_overrides(&mut config, |key| {
            (key == ENV_STORE_ID).then(|| "  ".to_string())
        });
        assert_eq!(config.remote.store_id, "42");
    }

    #[test]
    fn test_absolute_database_path_kept() {
        let mut config = embedded();
        config.database.path = "/var/lib/catalog.db".to_string();
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/var/lib/catalog.db")
        );
    }
}
