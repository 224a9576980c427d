use std::env;

/// Настройки из переменных окружения. Токен бота читает сам teloxide
/// из TELOXIDE_TOKEN.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub catalog_db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let catalog_db_path =
            env::var("CATALOG_DB_PATH").unwrap_or_else(|_| "catalog.db".to_string());

        Ok(Config {
            database_url,
            catalog_db_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_an_error() {
        env::remove_var("DATABASE_URL");
        assert!(Config::from_env().is_err());

        env::set_var("DATABASE_URL", "postgres://localhost/anketa");
        env::remove_var("CATALOG_DB_PATH");
        let config = Config::from_env().unwrap();
        assert_eq!(config.database_url, "postgres://localhost/anketa");
        assert_eq!(config.catalog_db_path, "catalog.db");
        env::remove_var("DATABASE_URL");
    }
}
