use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyId, DisplayName, PositionId, TypeConstraintError};

/// Category a position is advertised under.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PositionCategory {
    Internship,
    Graduate,
    PartTime,
    FullTime,
}

impl Display for PositionCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PositionCategory::Internship => "internship",
            PositionCategory::Graduate => "graduate",
            PositionCategory::PartTime => "part-time",
            PositionCategory::FullTime => "full-time",
        };
        write!(f, "{label}")
    }
}

impl PositionCategory {
    /// Parses a category from its lowercase label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "internship" => Some(PositionCategory::Internship),
            "graduate" => Some(PositionCategory::Graduate),
            "part-time" | "part_time" => Some(PositionCategory::PartTime),
            "full-time" | "full_time" => Some(PositionCategory::FullTime),
            _ => None,
        }
    }
}

/// An open position offered by a company.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub id: PositionId,
    pub company_id: CompanyId,
    pub title: DisplayName,
    pub category: PositionCategory,
    pub seats: u32,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewPosition {
    pub company_id: CompanyId,
    pub title: DisplayName,
    pub category: PositionCategory,
    pub seats: u32,
}

impl NewPosition {
    pub fn try_new(
        company_id: CompanyId,
        title: &str,
        category: PositionCategory,
        seats: u32,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            company_id,
            title: DisplayName::new(title)?,
            category,
            seats,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdatePosition {
    pub title: DisplayName,
    pub category: PositionCategory,
    pub seats: u32,
    pub active: bool,
}
