use std::fmt;

/// Where the password for an HMC login comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialReference {
    /// Password written directly in the configuration
    Inline(String),
    /// Name of an environment variable holding the password
    Env(String),
}

impl CredentialReference {
    /// Resolves the reference into a secret.
    ///
    /// `lookup` abstracts the environment so resolution stays testable.
    ///
    /// # Errors
    /// Returns a human-readable reason when the secret is absent or empty.
    pub fn resolve<F>(&self, lookup: F) -> Result<Secret, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = match self {
            CredentialReference::Inline(password) => password.clone(),
            CredentialReference::Env(name) => lookup(name)
                .ok_or_else(|| format!("environment variable {} is not set", name))?,
        };

        if value.is_empty() {
            return Err(match self {
                CredentialReference::Inline(_) => "inline password is empty".to_string(),
                CredentialReference::Env(name) => {
                    format!("environment variable {} is empty", name)
                }
            });
        }

        Ok(Secret(value))
    }
}

/// A resolved password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

/// A concrete HMC to query during one inventory run.
///
/// Two endpoints are the same HMC when their hosts match case-insensitively.
#[derive(Debug, Clone)]
pub struct HmcEndpoint {
    host: String,
    username: String,
    password: Secret,
}

impl HmcEndpoint {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: Secret) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }

    /// Normalized identity used for de-duplication
    pub fn identity(&self) -> String {
        self.host.to_ascii_lowercase()
    }
}

impl fmt::Display for HmcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.host)
    }
}
