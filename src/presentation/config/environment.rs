use std::fmt;
use std::str::FromStr;

pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Deployment the process runs in; picks the `appsettings.{name}.toml` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment `{0}`, expected local, test or prod")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    /// Reads `APP_ENVIRONMENT`. Unset means local.
    pub fn from_env() -> Result<Self, UnknownEnvironment> {
        Self::from_var(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    pub fn from_var(value: Option<&str>) -> Result<Self, UnknownEnvironment> {
        value.map_or(Ok(Self::default()), str::parse)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }

    /// Production logs default to JSON.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Prod)
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
