//! Catalogued objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{DomainError, DomainResult, Entity, ObjectId, Record, UserId};

const MIN_SECTION_LEN: usize = 10;

/// Containment class of an object.
///
/// Records written by the Russian-language client carry localized names;
/// those map onto the same variants. Any other label is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    #[serde(alias = "Безопасный")]
    Safe,
    #[serde(alias = "Евклид")]
    Euclid,
    #[serde(alias = "Кетер")]
    Keter,
    #[serde(alias = "Таумиэль")]
    Thaumiel,
    #[serde(alias = "Нейтрализованный")]
    Neutralized,
    #[serde(untagged)]
    Other(String),
}

impl core::fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ObjectClass::Safe => "Safe",
            ObjectClass::Euclid => "Euclid",
            ObjectClass::Keter => "Keter",
            ObjectClass::Thaumiel => "Thaumiel",
            ObjectClass::Neutralized => "Neutralized",
            ObjectClass::Other(label) => label,
        };
        f.write_str(s)
    }
}

/// A catalogued object record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "class")]
    pub object_class: ObjectClass,
    pub description: String,
    pub containment: String,
    pub procedures: String,
    pub discovery: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addenda: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of an object, as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDraft {
    pub name: String,
    pub object_class: ObjectClass,
    pub description: String,
    pub containment: String,
    pub procedures: String,
    pub discovery: String,
    pub addenda: Option<String>,
}

impl ObjectDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("object name is required"));
        }
        if matches!(&self.object_class, ObjectClass::Other(label) if label.trim().is_empty()) {
            return Err(DomainError::validation("object class is required"));
        }
        for (field, value) in [
            ("description", &self.description),
            ("containment", &self.containment),
            ("procedures", &self.procedures),
            ("discovery", &self.discovery),
        ] {
            if value.trim().chars().count() < MIN_SECTION_LEN {
                return Err(DomainError::validation(format!(
                    "{field} must be at least {MIN_SECTION_LEN} characters"
                )));
            }
        }
        Ok(())
    }

    fn addenda(&self) -> Option<String> {
        self.addenda
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
    }
}

impl ContentObject {
    /// Build a new record from a validated draft.
    pub fn create(
        id: ObjectId,
        draft: &ObjectDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            object_class: draft.object_class.clone(),
            description: draft.description.clone(),
            containment: draft.containment.clone(),
            procedures: draft.procedures.clone(),
            discovery: draft.discovery.clone(),
            addenda: draft.addenda(),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit; identity, authorship and creation time are preserved.
    pub fn apply_edit(&mut self, draft: &ObjectDraft, now: DateTime<Utc>) -> DomainResult<()> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.object_class = draft.object_class.clone();
        self.description = draft.description.clone();
        self.containment = draft.containment.clone();
        self.procedures = draft.procedures.clone();
        self.discovery = draft.discovery.clone();
        self.addenda = draft.addenda();
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for ContentObject {
    type Id = ObjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for ContentObject {
    const COLLECTION: &'static str = "objects";
}

/// Next catalogue id: one past the highest `sce-NNN` number in use.
///
/// Deleting an object never causes its number to be reissued to a different
/// object while a higher number exists. Fails once `u32::MAX` is taken.
pub fn next_object_id(existing: &[ContentObject]) -> DomainResult<ObjectId> {
    let highest = existing.iter().filter_map(|o| o.id.number()).max().unwrap_or(0);
    let next = highest
        .checked_add(1)
        .ok_or_else(|| DomainError::invariant(format!("object numbers exhausted at {highest}")))?;
    Ok(ObjectId::from_number(next))
}
