//! Connection configuration and connection strings.

use std::fmt::Write as _;
use std::time::Duration;

use crate::error::{Error, Result};

/// Replacement text for masked credentials in an obfuscated connection
/// string.
const CREDENTIAL_MASK: &str = "*****";

/// Configuration for connecting to SQL Server.
///
/// Build one with the `#[must_use]` setters, or parse an ADO.NET-style
/// connection string with [`Config::from_connection_string`]. A config can
/// be rendered back to its canonical connection string form, including an
/// obfuscated rendering safe for logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Server hostname or IP address.
    pub host: String,

    /// Server port (default: 1433).
    pub port: u16,

    /// Instance name (for named instances).
    pub instance: Option<String>,

    /// Database name.
    pub database: Option<String>,

    /// SQL Server login name. `None` selects integrated authentication.
    pub username: Option<String>,

    /// SQL Server login password.
    pub password: Option<String>,

    /// Application name (shown in SQL Server management tools).
    pub application_name: Option<String>,

    /// Whether to trust the server certificate.
    pub trust_server_certificate: bool,

    /// Whether to require encryption (TLS).
    pub encrypt: bool,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Default timeout for command execution.
    pub command_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            instance: None,
            database: None,
            username: None,
            password: None,
            application_name: None,
            trust_server_certificate: false,
            encrypt: true,
            connect_timeout: Duration::from_secs(15),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a connection string into configuration.
    ///
    /// Supports ADO.NET-style connection strings:
    /// ```text
    /// Server=localhost;Database=mydb;User Id=sa;Password=secret;
    /// ```
    ///
    /// Unknown keys are ignored for forward compatibility.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let mut config = Self::default();

        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "server" | "data source" | "host" => {
                    // Handle host,port or host\instance format
                    if let Some((host, port)) = value.split_once(',') {
                        config.host = host.to_string();
                        config.port = port
                            .parse()
                            .map_err(|_| Error::Config(format!("invalid port: {port}")))?;
                    } else if let Some((host, instance)) = value.split_once('\\') {
                        config.host = host.to_string();
                        config.instance = Some(instance.to_string());
                    } else {
                        config.host = value.to_string();
                    }
                }
                "port" => {
                    config.port = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid port: {value}")))?;
                }
                "database" | "initial catalog" => {
                    config.database = Some(value.to_string());
                }
                "user id" | "uid" | "user" => {
                    config.username = Some(value.to_string());
                }
                "password" | "pwd" => {
                    config.password = Some(value.to_string());
                }
                "application name" | "app" => {
                    config.application_name = Some(value.to_string());
                }
                "integrated security" => {
                    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("sspi") {
                        config.username = None;
                        config.password = None;
                    }
                }
                "connect timeout" | "connection timeout" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid timeout: {value}")))?;
                    config.connect_timeout = Duration::from_secs(secs);
                }
                "command timeout" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid timeout: {value}")))?;
                    config.command_timeout = Duration::from_secs(secs);
                }
                "trustservercertificate" | "trust server certificate" => {
                    config.trust_server_certificate = value.eq_ignore_ascii_case("true")
                        || value.eq_ignore_ascii_case("yes")
                        || value == "1";
                }
                "encrypt" => {
                    config.encrypt = value.eq_ignore_ascii_case("true")
                        || value.eq_ignore_ascii_case("yes")
                        || value == "1";
                }
                _ => {
                    tracing::debug!(
                        key = key,
                        value = value,
                        "ignoring unknown connection string option"
                    );
                }
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Render the canonical connection string for this configuration.
    ///
    /// Only non-default options are included. The result parses back to an
    /// equal configuration with [`Config::from_connection_string`].
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        self.render_connection_string(false, false)
    }

    /// Render the connection string with credentials masked.
    ///
    /// The password is always replaced with `*****`; pass
    /// `obfuscate_username` to mask the login name as well. Safe to log. A
    /// configuration without credentials renders unchanged.
    #[must_use]
    pub fn obfuscated_connection_string(&self, obfuscate_username: bool) -> String {
        self.render_connection_string(true, obfuscate_username)
    }

    fn render_connection_string(&self, obfuscate_password: bool, obfuscate_username: bool) -> String {
        let mut rendered = String::new();

        let _ = write!(rendered, "Server={}", self.host);
        if let Some(instance) = &self.instance {
            let _ = write!(rendered, "\\{instance}");
        } else if self.port != 1433 {
            let _ = write!(rendered, ",{}", self.port);
        }

        if let Some(database) = &self.database {
            let _ = write!(rendered, ";Database={database}");
        }

        match &self.username {
            Some(username) => {
                let shown = if obfuscate_username { CREDENTIAL_MASK } else { username };
                let _ = write!(rendered, ";User Id={shown}");
                if let Some(password) = &self.password {
                    let shown = if obfuscate_password { CREDENTIAL_MASK } else { password.as_str() };
                    let _ = write!(rendered, ";Password={shown}");
                }
            }
            None => rendered.push_str(";Integrated Security=True"),
        }

        if let Some(application_name) = &self.application_name {
            let _ = write!(rendered, ";Application Name={application_name}");
        }
        if self.trust_server_certificate {
            rendered.push_str(";TrustServerCertificate=True");
        }
        if !self.encrypt {
            rendered.push_str(";Encrypt=False");
        }
        if self.connect_timeout != Duration::from_secs(15) {
            let _ = write!(rendered, ";Connect Timeout={}", self.connect_timeout.as_secs());
        }
        if self.command_timeout != Duration::from_secs(30) {
            let _ = write!(rendered, ";Command Timeout={}", self.command_timeout.as_secs());
        }

        rendered
    }

    /// Set the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the instance name.
    #[must_use]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set or replace the database name.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set SQL Server credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Set trust server certificate option.
    #[must_use]
    pub fn trust_server_certificate(mut self, trust: bool) -> Self {
        self.trust_server_certificate = trust;
        self
    }

    /// Enable or disable TLS encryption.
    ///
    /// **Warning:** Disabling encryption is insecure and should only be
    /// used for development/testing on trusted networks.
    #[must_use]
    pub fn encrypt(mut self, enabled: bool) -> Self {
        self.encrypt = enabled;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the default command execution timeout.
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Check that the configuration can be used to open a connection.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("server host is empty".to_string()));
        }
        Ok(())
    }

    /// Build the underlying client configuration.
    pub(crate) fn to_client_config(&self) -> tiberius::Config {
        let mut client_config = tiberius::Config::new();

        client_config.host(&self.host);
        client_config.port(self.port);

        if let Some(instance) = &self.instance {
            client_config.instance_name(instance);
        }
        if let Some(database) = &self.database {
            client_config.database(database);
        }
        if let Some(application_name) = &self.application_name {
            client_config.application_name(application_name);
        }
        if self.trust_server_certificate {
            client_config.trust_cert();
        }
        client_config.encryption(if self.encrypt {
            tiberius::EncryptionLevel::Required
        } else {
            tiberius::EncryptionLevel::NotSupported
        });

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                client_config.authentication(tiberius::AuthMethod::sql_server(username, password));
            }
            (Some(username), None) => {
                client_config.authentication(tiberius::AuthMethod::sql_server(username, ""));
            }
            (None, _) => {
                #[cfg(windows)]
                client_config.authentication(tiberius::AuthMethod::Integrated);
            }
        }

        client_config
    }
}
