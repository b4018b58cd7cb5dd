//! JWT issuing and validation

use chrono::Utc;
use complex_forms_common::{UserId, UserRecord};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: i64::try_from(ttl_hours.saturating_mul(3600)).unwrap_or(i64::MAX),
        }
    }

    /// Random 32-byte secret, hex encoded.
    pub fn random_secret() -> String {
        hex::encode(rand::random::<[u8; 32]>())
    }

    pub fn issue(&self, user: &UserRecord) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            id: 7,
            email: "demo@example.com".into(),
            password_hash: String::new(),
            first_name: "Demo".into(),
            last_name: "User".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(b"secret", 24);
        let token = signer.issue(&user()).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "demo@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenSigner::new(b"one", 1).issue(&user()).unwrap();
        assert!(TokenSigner::new(b"two", 1).verify(&token).is_err());
        assert!(TokenSigner::new(b"one", 1).verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::new(b"secret", 0);
        let token = signer.issue(&user()).unwrap();
        // exp == iat; validation allows no leeway
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_random_secret_is_unique() {
        let a = TokenSigner::random_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, TokenSigner::random_secret());
    }
}
