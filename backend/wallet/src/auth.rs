//! # Signup & Login Validation
//!
//! Role-gated entry rules. The role PIN check mirrors the prototype's placeholder
//! secrets; a deployment swaps [`RoleSecrets`] for server-side verification.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignupError {
    #[error("username is required")]
    EmptyUsername,

    #[error("PINs do not match, please re-enter")]
    PinMismatch,

    #[error("incorrect PIN for {0}")]
    WrongRolePin(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    RestaurantOwner,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::RestaurantOwner => "restaurant owner",
        }
    }
}

/// Per-role login secrets. Defaults are the prototype placeholders.
#[derive(Debug, Clone)]
pub struct RoleSecrets {
    pub student: String,
    pub owner: String,
}

impl Default for RoleSecrets {
    fn default() -> Self {
        Self {
            student: "student".to_string(),
            owner: "restaurent".to_string(),
        }
    }
}

impl RoleSecrets {
    pub fn verify(&self, role: Role, pin: &str) -> Result<(), SignupError> {
        let expected = match role {
            Role::Student => &self.student,
            Role::RestaurantOwner => &self.owner,
        };

        if pin == expected {
            Ok(())
        } else {
            Err(SignupError::WrongRolePin(role.label()))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub role: Role,
    pub username: String,
    pub pin: String,
    pub confirm_pin: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), SignupError> {
        if self.username.trim().is_empty() {
            return Err(SignupError::EmptyUsername);
        }
        if self.pin != self.confirm_pin {
            return Err(SignupError::PinMismatch);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pin: &str, confirm: &str) -> SignupForm {
        SignupForm {
            role: Role::Student,
            username: "RichGuy".to_string(),
            pin: pin.to_string(),
            confirm_pin: confirm.to_string(),
        }
    }

    #[test]
    fn mismatched_pins_are_rejected() {
        assert_eq!(
            form("1234", "4321").validate(),
            Err(SignupError::PinMismatch)
        );
        assert_eq!(form("1234", "1234").validate(), Ok(()));
    }

    #[test]
    fn username_must_not_be_blank() {
        let mut f = form("1234", "1234");
        f.username = "   ".to_string();

        assert_eq!(f.validate(), Err(SignupError::EmptyUsername));
    }

    #[test]
    fn role_pins_verify_against_their_own_secret() {
        let secrets = RoleSecrets::default();

        assert_eq!(secrets.verify(Role::Student, "student"), Ok(()));
        assert_eq!(secrets.verify(Role::RestaurantOwner, "restaurent"), Ok(()));
        assert_eq!(
            secrets.verify(Role::Student, "restaurent"),
            Err(SignupError::WrongRolePin("student"))
        );
    }
}
