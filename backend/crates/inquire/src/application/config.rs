//! Application Configuration

use std::time::Duration;

use platform::cookie::CookieConfig;
pub use platform::cookie::SameSite;

#[derive(Debug, Clone)]
pub struct InquireConfig {
    pub session_cookie_name: String,
    /// HMAC-SHA256 key for session tokens
    pub session_secret: [u8; 32],
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Application-wide secret appended to passwords before hashing
    pub password_pepper: Option<Vec<u8>>,
    /// `questions` when `max_results` is omitted
    pub default_max_results: u32,
    /// Hard cap on `max_results`
    pub max_results_ceiling: u32,
    /// `questions` when `max_distance` is omitted
    pub default_max_distance_miles: f64,
    /// Route `/randomize`
    pub seed_endpoint_enabled: bool,
    /// Accounts that own seeded questions
    pub seed_emails: Vec<String>,
}

impl Default for InquireConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "inquire_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(14 * 24 * 3600), // 2 weeks
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            default_max_results: 25,
            max_results_ceiling: 100,
            default_max_distance_miles: 50.0,
            seed_endpoint_enabled: false,
            seed_emails: vec![
                "email1@example.com".to_string(),
                "email2@example.com".to_string(),
            ],
        }
    }
}

impl InquireConfig {
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }

    /// Insecure cookie, seeding enabled
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            seed_endpoint_enabled: true,
            ..Self::with_random_secret()
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// TTLs too large for chrono fall back to the two-week default.
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or_else(|_| chrono::Duration::weeks(2))
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(i64::try_from(self.session_ttl.as_secs()).unwrap_or(i64::MAX)),
        }
    }

    /// Resolve a requested result count against the default and ceiling
    pub fn effective_max_results(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_max_results)
            .min(self.max_results_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InquireConfig::default();
        assert_eq!(config.default_max_results, 25);
        assert_eq!(config.default_max_distance_miles, 50.0);
        assert!(!config.seed_endpoint_enabled);
    }

    #[test]
    fn test_random_secret() {
        assert_ne!(
            InquireConfig::with_random_secret().session_secret,
            InquireConfig::with_random_secret().session_secret
        );
    }

    #[test]
    fn test_max_results_resolution() {
        let config = InquireConfig::default();
        assert_eq!(config.effective_max_results(None), 25);
        assert_eq!(config.effective_max_results(Some(10)), 10);
        assert_eq!(config.effective_max_results(Some(10_000)), 100);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = InquireConfig::development().session_cookie();
        assert_eq!(cookie.name, "inquire_session");
        assert!(cookie.http_only);
        assert!(!cookie.secure);
        assert_eq!(cookie.max_age_secs, Some(14 * 24 * 3600));
    }
}
