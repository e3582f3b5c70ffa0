use serde::Deserialize;

use crate::auth::Role;

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl CreateLeadRequest {
    /// Required-field checks, surfaced inline before any write.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Nome é obrigatório");
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("E-mail é obrigatório");
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err("E-mail inválido");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[cfg(test)]
mod lead_tests {
    use super::*;

    fn lead(name: &str, email: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            name: name.into(),
            email: email.into(),
            phone: None,
            message: None,
        }
    }

    #[test]
    fn accepts_a_plausible_lead() {
        assert!(lead("Maria", "maria@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        assert_eq!(lead("", "maria@example.com").validate(), Err("Nome é obrigatório"));
        assert_eq!(lead("Maria", "  ").validate(), Err("E-mail é obrigatório"));
    }

    #[test]
    fn rejects_malformed_email() {
        assert_eq!(lead("Maria", "maria.example.com").validate(), Err("E-mail inválido"));
        assert_eq!(lead("Maria", "@example.com").validate(), Err("E-mail inválido"));
        assert_eq!(lead("Maria", "maria@").validate(), Err("E-mail inválido"));
    }
}
