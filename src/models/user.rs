use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Role-specific payload. Admins carry credentials, customers carry contact
/// details; no shared base type to inherit from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserKind {
    Admin {
        #[serde(skip_serializing)]
        password_hash: String,
    },
    Customer {
        shipping_address: String,
        phone_number: String,
    },
}

impl UserKind {
    pub fn role(&self) -> &'static str {
        match self {
            UserKind::Admin { .. } => "admin",
            UserKind::Customer { .. } => "customer",
        }
    }
}

/// A gallery account: one row in `users`, tagged by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(flatten)]
    pub kind: UserKind,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.kind, UserKind::Admin { .. })
    }
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let kind = match role.as_str() {
            "admin" => UserKind::Admin {
                password_hash: row
                    .try_get::<Option<String>, _>("password_hash")?
                    .unwrap_or_default(),
            },
            "customer" => UserKind::Customer {
                shipping_address: row
                    .try_get::<Option<String>, _>("shipping_address")?
                    .unwrap_or_default(),
                phone_number: row
                    .try_get::<Option<String>, _>("phone_number")?
                    .unwrap_or_default(),
            },
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "role".to_string(),
                    source: format!("unknown user role: {}", other).into(),
                })
            }
        };

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
            is_active: row.try_get("is_active")?,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_match_discriminant_column() {
        let admin = UserKind::Admin {
            password_hash: "hash".into(),
        };
        let customer = UserKind::Customer {
            shipping_address: String::new(),
            phone_number: String::new(),
        };
        assert_eq!(admin.role(), "admin");
        assert_eq!(customer.role(), "customer");
    }

    #[test]
    fn admin_password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            email: "root@gallery".into(),
            username: "root".into(),
            created_at: Utc::now(),
            is_active: true,
            kind: UserKind::Admin {
                password_hash: "secret-hash".into(),
            },
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
