use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Agent => "agent",
        }
    }

    /// Agents stay unverified until manual review; everyone else starts verified.
    pub fn default_verified(&self) -> bool {
        !matches!(self, Role::Agent)
    }
}

/// A persisted user row. The password hash and the live verification code
/// never serialize into responses.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub school_id: Option<String>,
    pub business_reg_number: Option<String>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    pub terms_accepted: bool,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub verified_status: bool,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub verification_code_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub school_id: Option<String>,
    pub business_reg_number: Option<String>,
    pub address: Option<String>,
    pub profile_image_url: Option<String>,
    pub terms_accepted: bool,
    pub terms_accepted_at: DateTime<Utc>,
    pub verified_status: bool,
}

pub async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("SELECT 1 FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(result.is_some())
}

pub async fn insert_user(pool: &PgPool, user: NewUser) -> Result<UserRecord, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (
            id, email, password_hash, first_name, last_name, phone, role,
            school_id, business_reg_number, address, profile_image_url,
            terms_accepted, terms_accepted_at, verified_status, email_verified
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, FALSE)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(user.role.as_str())
    .bind(&user.school_id)
    .bind(&user.business_reg_number)
    .bind(&user.address)
    .bind(&user.profile_image_url)
    .bind(user.terms_accepted)
    .bind(user.terms_accepted_at)
    .bind(user.verified_status)
    .fetch_one(pool)
    .await
}

pub async fn set_verification_code(
    pool: &PgPool,
    user_id: Uuid,
    code: &str,
    expires: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET verification_code = $2, verification_code_expires = $3 WHERE id = $1",
    )
    .bind(user_id)
    .bind(code)
    .bind(expires)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agents_default_to_unverified() {
        assert!(!Role::Agent.default_verified());
        assert!(Role::Buyer.default_verified());
        assert!(Role::Seller.default_verified());
    }

    #[test]
    fn role_deserializes_from_lowercase() {
        let role: Role = serde_json::from_str("\"agent\"").unwrap();
        assert_eq!(role, Role::Agent);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn serialized_user_omits_secrets() {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            first_name: "A".to_string(),
            last_name: None,
            phone: None,
            role: "buyer".to_string(),
            school_id: None,
            business_reg_number: None,
            address: None,
            profile_image_url: None,
            terms_accepted: true,
            terms_accepted_at: Some(Utc::now()),
            verified_status: true,
            email_verified: false,
            verification_code: Some("123456".to_string()),
            verification_code_expires: Some(Utc::now()),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["emailVerified"], false);
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert!(value.get("verificationCode").is_none());
    }
}
