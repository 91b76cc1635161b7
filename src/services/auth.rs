//! Authentication service
//!
//! Signup, login, bcrypt password hashing, and JWT minting/verification.
//! Sessions are a single signed token carried in an HTTP-only cookie; there
//! is no refresh token and no server-side revocation list. Logout clears the
//! cookie on the client, so a token that leaks remains valid until its
//! natural expiry (accepted risk, documented in DESIGN.md).

use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::db::{CreateUser, Database, UserRecord};

/// Claims carried in the auth cookie token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub uid: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 7 days)
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_lifetime: 7 * 24 * 60 * 60,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

/// Signup input, after GraphQL deserialization
#[derive(Debug, Clone)]
pub struct SignupData {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub day: u32,
    pub month: String,
    pub year: i32,
    pub gender: String,
}

/// Parse a three-letter month name to its 1-based month number
pub fn month_number(month: &str) -> Result<u32> {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS
        .iter()
        .position(|m| *m == month)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| anyhow!("Invalid month"))
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user
    pub async fn signup(&self, input: SignupData) -> Result<UserRecord> {
        let users = self.db.users();

        if users.get_by_email(&input.email).await?.is_some() {
            return Err(anyhow!("Email already in use"));
        }

        let dob = NaiveDate::from_ymd_opt(input.year, month_number(&input.month)?, input.day)
            .ok_or_else(|| anyhow!("Invalid date of birth"))?;

        let password_hash = self.hash_password(&input.password)?;

        let user = users
            .create(CreateUser {
                first_name: input.first_name,
                surname: input.surname,
                email: input.email,
                password_hash,
                dob: dob.to_string(),
                gender: input.gender,
            })
            .await?;

        Ok(user)
    }

    /// Login with email and password, returning the user and a fresh token
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserRecord, String)> {
        let user = self
            .db
            .users()
            .get_by_email(email)
            .await?
            .ok_or_else(|| anyhow!("Invalid credentials"))?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(anyhow!("Invalid credentials"));
        }

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Mint a signed token for a user id
    pub fn issue_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            uid: user_id.to_string(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create token: {}", e))
    }

    /// Token lifetime in seconds, for cookie max-age
    pub fn token_lifetime(&self) -> i64 {
        self.config.token_lifetime
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.config.bcrypt_cost).map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    fn verify_password(&self, password: &str, hashed: &str) -> Result<bool> {
        verify(password, hashed).map_err(|e| anyhow!("Failed to verify password: {}", e))
    }
}

/// Verify a signed token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // The claims set has no aud field
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| anyhow!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;

    fn service(db: Database) -> AuthService {
        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime: 3600,
                // Minimum cost keeps the test fast
                bcrypt_cost: 4,
            },
        )
    }

    fn signup_data(email: &str) -> SignupData {
        SignupData {
            first_name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
            day: 10,
            month: "Dec".to_string(),
            year: 1815,
            gender: "female".to_string(),
        }
    }

    #[test]
    fn month_number_maps_all_months() {
        assert_eq!(month_number("Jan").unwrap(), 1);
        assert_eq!(month_number("Dec").unwrap(), 12);
        assert!(month_number("Frob").is_err());
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let db = memory_db().await;
        let auth = service(db);

        auth.signup(signup_data("ada@example.com")).await.unwrap();
        let err = auth
            .signup(signup_data("ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already in use");
    }

    #[tokio::test]
    async fn login_roundtrip_and_token_verification() {
        let db = memory_db().await;
        let auth = service(db);

        let created = auth.signup(signup_data("ada@example.com")).await.unwrap();
        let (user, token) = auth.login("ada@example.com", "hunter2").await.unwrap();
        assert_eq!(user.id, created.id);

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.uid, created.id);

        assert!(verify_token(&token, "wrong-secret").is_err());
    }

    #[tokio::test]
    async fn login_rejects_bad_password() {
        let db = memory_db().await;
        let auth = service(db);

        auth.signup(signup_data("ada@example.com")).await.unwrap();
        let err = auth
            .login("ada@example.com", "not-hunter2")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
