use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of roles stored in `user_roles`. Routing is an exhaustive
/// match; an unrecognized database value is an error, never a silent
/// fallback to a default role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lojista,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lojista => "lojista",
            Role::User => "user",
        }
    }

    /// Panel a user of this role lands on after login.
    pub fn panel_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Lojista => "/painel",
            Role::User => "/conta",
        }
    }

    /// Admin satisfies every role requirement; everyone else only their own.
    pub fn satisfies(self, wanted: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Lojista => wanted == Role::Lojista || wanted == Role::User,
            Role::User => wanted == Role::User,
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "lojista" => Ok(Role::Lojista),
            "user" => Ok(Role::User),
            other => anyhow::bail!("papel desconhecido: {other:?}"),
        }
    }
}

#[cfg(test)]
mod role_tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("lojista".parse::<Role>().unwrap(), Role::Lojista);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn unknown_role_is_an_error() {
        let err = "manager".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("manager"));
    }

    #[test]
    fn panel_dispatch_is_exhaustive() {
        assert_eq!(Role::Admin.panel_path(), "/admin");
        assert_eq!(Role::Lojista.panel_path(), "/painel");
        assert_eq!(Role::User.panel_path(), "/conta");
    }

    #[test]
    fn admin_satisfies_everything() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Lojista));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Lojista));
        assert!(!Role::Lojista.satisfies(Role::Admin));
        assert!(Role::Lojista.satisfies(Role::User));
    }
}
