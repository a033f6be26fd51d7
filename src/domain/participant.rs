use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContactEmail, DisplayName, ParticipantId, TypeConstraintError};

/// A student registered for the career fair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: DisplayName,
    pub email: ContactEmail,
    pub university: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewParticipant {
    pub name: DisplayName,
    pub email: ContactEmail,
    pub university: Option<String>,
}

impl NewParticipant {
    pub fn try_new(
        name: &str,
        email: &str,
        university: Option<&str>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            name: DisplayName::new(name)?,
            email: ContactEmail::new(email)?,
            university: university
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}
