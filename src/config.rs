/// Which backend deployment the client talks to.
///
/// Selection is static per build: debug builds target the local backend,
/// release builds the hosted one. Not changeable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local backend during development
    Development,
    /// Hosted production backend
    Production,
}

impl Environment {
    /// The environment this binary was built for.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    /// Base URL of the extraction backend for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:8000",
            Environment::Production => "https://twihub-backend-production.up.railway.app",
        }
    }
}

/// Resolved application configuration, built once in `main` and handed to
/// the view. Keeps endpoint selection out of module-level constants so the
/// extraction client can be pointed elsewhere in tests.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the extraction backend (no trailing path)
    pub base_url: String,
}

impl AppConfig {
    /// Configuration for the environment this binary was built for.
    pub fn resolve() -> Self {
        Self::for_environment(Environment::current())
    }

    pub fn for_environment(env: Environment) -> Self {
        Self {
            base_url: env.base_url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_targets_local_backend() {
        let config = AppConfig::for_environment(Environment::Development);
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn production_targets_hosted_backend() {
        let config = AppConfig::for_environment(Environment::Production);
        assert_eq!(
            config.base_url,
            "https://twihub-backend-production.up.railway.app"
        );
    }

    #[test]
    fn resolve_matches_current_environment() {
        let config = AppConfig::resolve();
        assert_eq!(config.base_url, Environment::current().base_url());
    }
}
