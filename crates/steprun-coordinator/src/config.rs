//! Coordinator configuration.

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_addr: String,

    /// Password for the built-in `admin` operator.
    pub admin_password: String,

    /// Extra operator accounts as `(name, password)` pairs.
    pub operators: Vec<(String, String)>,
}

impl Config {
    /// Parse an `name:password` operator spec.
    pub fn parse_operator(spec: &str) -> Result<(String, String), String> {
        match spec.split_once(':') {
            Some((name, password)) if !name.trim().is_empty() && !password.is_empty() => {
                Ok((name.trim().to_string(), password.to_string()))
            }
            _ => Err(format!("invalid operator '{spec}', expected name:password")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8080".to_string(),
            admin_password: "123456".to_string(),
            operators: Vec::new(),
        }
    }
}
