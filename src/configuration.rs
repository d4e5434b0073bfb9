use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub session_store: SessionStoreSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Key-value cache holding the active refresh session per user.
#[derive(serde::Deserialize, Clone)]
pub struct SessionStoreSettings {
    pub host: String,
    pub port: u16,
    pub database: i64,
    /// Upper bound for a single cache call, in milliseconds.
    pub timeout_ms: u64,
}

impl SessionStoreSettings {
    pub fn connection_string(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Signing secret and lifetime for one token class.
#[derive(serde::Deserialize, Clone)]
pub struct TokenDef {
    pub secret: String,
    pub expiry_seconds: i64, // access: short (e.g. 900), refresh: long (e.g. 604800)
}

/// JWT settings for both token classes. The two secrets must differ so a
/// token signed for one class never verifies against the other.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub access: TokenDef,
    pub refresh: TokenDef,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: String,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}
