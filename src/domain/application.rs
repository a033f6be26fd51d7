use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{ApplicationId, ParticipantId, PositionId};

/// Review status of an application.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Accepted,
    Rejected,
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        };
        write!(f, "{label}")
    }
}

/// A participant's application to a single position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    /// Opaque reference printed on confirmations and answer sheets.
    pub reference: Uuid,
    pub participant_id: ParticipantId,
    pub position_id: PositionId,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewApplication {
    pub reference: Uuid,
    pub participant_id: ParticipantId,
    pub position_id: PositionId,
}

impl NewApplication {
    /// Builds a submission with a freshly generated reference.
    pub fn new(participant_id: ParticipantId, position_id: PositionId) -> Self {
        Self {
            reference: Uuid::new_v4(),
            participant_id,
            position_id,
        }
    }
}
