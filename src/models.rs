//! Section data model
//!
//! A `SectionRecord` groups an originating prompt with its ordered section
//! items. Generated records always carry `[Hero, About, Contact]`; manually
//! saved records carry whatever the caller supplied (subject to the store's
//! save semantics).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named UI fragment: a section name and its markup-bearing code string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionItem {
    pub name: String,
    pub code: String,
}

/// A prompt together with its generated or saved sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub prompt: String,
    pub sections: Vec<SectionItem>,
}

/// A section record as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSectionRecord {
    pub record_id: Uuid,
    pub prompt: String,
    pub sections: Vec<SectionItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
