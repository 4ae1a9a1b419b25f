use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer, SessionStore,
};
use tracing::warn;

use super::{AppConfig, Environment};

/// Signed session layer over any store (SQLite in the server, memory in tests).
pub type SessionLayer<S> = SessionManagerLayer<S, SignedCookie>;

/// Cookie attributes for one deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub name: &'static str,
    pub secure: bool,
    pub same_site: SameSite,
    pub idle_timeout: Duration,
}

impl CookiePolicy {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            // `__Host-` cookies must be Secure with path `/`
            Environment::Production => CookiePolicy {
                name: "__Host-session",
                secure: true,
                same_site: SameSite::Strict,
                idle_timeout: Duration::hours(2),
            },
            Environment::Development => CookiePolicy {
                name: "session",
                secure: false,
                same_site: SameSite::Lax,
                idle_timeout: Duration::days(7),
            },
        }
    }
}

/// Builds the session layer for `config`, signing cookies with its `SECRET_KEY`.
pub fn session_layer<S: SessionStore + Clone>(store: S, config: &AppConfig) -> SessionLayer<S> {
    let policy = CookiePolicy::for_environment(config.environment);

    SessionManagerLayer::new(store)
        .with_name(policy.name)
        .with_secure(policy.secure)
        .with_http_only(true)
        .with_same_site(policy.same_site)
        .with_path("/")
        .with_expiry(Expiry::OnInactivity(policy.idle_timeout))
        .with_signed(signing_key(config.secret_key.as_deref()))
}

/// Derives the cookie signing key. A missing secret yields a random key that
/// lives as long as the process.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => {
            let bytes = secret_bytes(secret);
            if bytes.len() >= 64 {
                Key::from(&bytes[..64])
            } else {
                Key::from(Sha512::digest(&bytes).as_slice())
            }
        }
        None => {
            warn!("SECRET_KEY not set; sessions will not survive a restart");
            Key::generate()
        }
    }
}

/// Base64 secrets are decoded; anything else is used as raw bytes.
pub(crate) fn secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.trim())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_stretched_to_full_key() {
        let key = signing_key(Some("curta"));
        assert_eq!(key.master().len(), 64);
    }

    #[test]
    fn test_same_secret_gives_same_key() {
        let a = signing_key(Some("mesma-chave"));
        let b = signing_key(Some("mesma-chave"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), signing_key(Some("outra-chave")).master());
    }

    #[test]
    fn test_base64_secret_is_decoded() {
        let encoded = STANDARD.encode([7u8; 64]);
        assert_eq!(secret_bytes(&encoded), vec![7u8; 64]);
        assert_eq!(signing_key(Some(&encoded)).master(), &[7u8; 64][..]);
    }

    #[test]
    fn test_production_policy_is_strict() {
        let policy = CookiePolicy::for_environment(Environment::Production);
        assert!(policy.secure);
        assert_eq!(policy.same_site, SameSite::Strict);
        assert_eq!(policy.idle_timeout, Duration::hours(2));
    }
}
