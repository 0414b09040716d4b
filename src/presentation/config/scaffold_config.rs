/// Scaffold mode replaces the language model and speech clients with canned
/// in-process stand-ins, so the HTTP contract can be exercised without
/// credentials.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldConfig {
    pub enabled: bool,
}

impl ScaffoldConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SCAFFOLD_MODE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}
