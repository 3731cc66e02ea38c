use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use tracing::{error, info, warn};

use crate::utils::app_config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

/// What to do with deliveries when no shared secret is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsignedPolicy {
    Accept,
    Reject,
}

/// Checks the HMAC-SHA256 of a webhook body against the signature header.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<Vec<u8>>,
    unsigned_policy: UnsignedPolicy,
    header_name: String,
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("unsigned_policy", &self.unsigned_policy)
            .field("header_name", &self.header_name)
            .finish()
    }
}

impl SignatureVerifier {
    pub fn new(secret: Option<String>, unsigned_policy: UnsignedPolicy, header_name: &str) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| s.into_bytes()),
            unsigned_policy,
            header_name: header_name.to_lowercase(),
        }
    }

    /// Unsigned deliveries are only accepted outside production.
    pub fn from_config(config: &AppConfig) -> Self {
        let secret = config.resolve_webhook_secret();
        let unsigned_policy = if config.environment.is_production() {
            UnsignedPolicy::Reject
        } else {
            UnsignedPolicy::Accept
        };

        match (&secret, unsigned_policy) {
            (Some(_), _) => info!(
                "Webhook signature verification enabled on header {}",
                config.signature_header
            ),
            (None, UnsignedPolicy::Accept) => warn!(
                "No webhook secret configured: unsigned deliveries will be accepted ({:?})",
                config.environment
            ),
            (None, UnsignedPolicy::Reject) => error!(
                "No webhook secret configured in production: every delivery will be rejected"
            ),
        }

        Self::new(secret, unsigned_policy, &config.signature_header)
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Verifies `signature` against the raw `body`. Never fails past this
    /// boundary: any malformed input is a `false`.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(secret) = &self.secret else {
            return match self.unsigned_policy {
                UnsignedPolicy::Accept => {
                    warn!("Accepting unsigned webhook delivery, no secret configured");
                    true
                }
                UnsignedPolicy::Reject => {
                    error!("Rejecting webhook delivery, no secret configured");
                    false
                }
            };
        };

        let Some(signature) = signature else {
            return false;
        };

        let signature = signature.trim();
        let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
            return false;
        };
        mac.update(body);
        // constant time comparison
        mac.verify_slice(&expected).is_ok()
    }
}

/// Hex encoded HMAC-SHA256 of `body`, as a provider would send it.
pub fn compute_signature(secret: &[u8], body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}
