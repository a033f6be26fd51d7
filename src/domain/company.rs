use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyId, ContactEmail, DisplayName, TypeConstraintError, WebsiteUrl};

/// A company exhibiting at the career fair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: CompanyId,
    pub name: DisplayName,
    pub contact_email: ContactEmail,
    pub website: Option<WebsiteUrl>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCompany {
    pub name: DisplayName,
    pub contact_email: ContactEmail,
    pub website: Option<WebsiteUrl>,
    pub description: Option<String>,
}

impl NewCompany {
    /// Builds a new company from raw strings, normalizing optional fields.
    pub fn try_new(
        name: &str,
        contact_email: &str,
        website: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            name: DisplayName::new(name)?,
            contact_email: ContactEmail::new(contact_email)?,
            website: website.map(WebsiteUrl::new).transpose()?,
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: DisplayName,
    pub contact_email: ContactEmail,
    pub website: Option<WebsiteUrl>,
    pub description: Option<String>,
}
