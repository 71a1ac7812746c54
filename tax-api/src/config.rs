use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tax_core::db::DbConfig;

/// Personal income tax HTTP service.
///
/// Every option can also be supplied through the environment variable
/// shown in `--help`.
#[derive(Debug, Clone, Parser)]
#[command(name = "tax-api", version)]
pub struct Config {
    /// TCP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `taxes.db`), `:memory:`, or a
    /// `sqlite:` URL.
    #[arg(long, env = "DATABASE_URL", default_value = "taxes.db")]
    pub database_url: String,

    /// Database backend to use.
    #[arg(long, env = "DB_BACKEND", default_value = "sqlite")]
    pub db_backend: String,

    /// Username accepted on the admin endpoints.
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: String,

    /// Password accepted on the admin endpoints.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Name reported by the health endpoint.
    #[arg(long, env = "APP_NAME", default_value = "tax-api")]
    pub app_name: String,

    /// Version reported by the health endpoint.
    #[arg(long, env = "APP_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub app_version: String,

    /// Also append log records to this file.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.db_backend.clone(),
            connection_string: self.database_url.clone(),
        }
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }

    pub fn app_info(&self) -> AppInfo {
        AppInfo {
            name: self.app_name.clone(),
            version: self.app_version.clone(),
        }
    }
}

/// Basic-auth credentials guarding `/admin`.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(
        username: &str,
        password: &str,
    ) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn matches(
        &self,
        username: &str,
        password: &str,
    ) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Identity reported by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["tax-api"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = parse(&[
            "--port",
            "9090",
            "--database-url",
            ":memory:",
            "--db-backend",
            "sqlite",
            "--admin-username",
            "adminTax",
            "--admin-password",
            "admin!",
            "--app-name",
            "assessment-tax",
            "--app-version",
            "v1",
        ]);

        assert_eq!(config.listen_addr().port(), 9090);
        assert_eq!(
            config.db_config(),
            DbConfig {
                backend: "sqlite".to_string(),
                connection_string: ":memory:".to_string(),
            }
        );
        assert_eq!(
            config.app_info(),
            AppInfo {
                name: "assessment-tax".to_string(),
                version: "v1".to_string(),
            }
        );
        assert!(config.admin_credentials().matches("adminTax", "admin!"));
    }

    #[test]
    fn credentials_require_exact_match() {
        let creds = AdminCredentials::new("adminTax", "admin!");

        assert!(creds.matches("adminTax", "admin!"));
        assert!(!creds.matches("admintax", "admin!"));
        assert!(!creds.matches("adminTax", "admin"));
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = AdminCredentials::new("adminTax", "s3cret");

        let rendered = format!("{creds:?}");

        assert!(rendered.contains("adminTax"));
        assert!(!rendered.contains("s3cret"));
    }
}
