use crate::model::Reference;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

///
/// CareerRecord
///
/// One employee career-history entry as held by the form.
/// `references` is the root partition: root scalar fields and individual
/// `skills` elements. Keys with no typed field (configured fields) are kept
/// in `extra`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CareerRecord {
    pub company: String,
    pub duration: String,
    pub last_drawn_salary: String,
    pub appointment: Appointment,
    pub skills: Vec<String>,
    pub references: Vec<Reference>,
    pub certifications: Vec<Certification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

///
/// Appointment
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Appointment {
    pub position: String,
    pub rank: String,
    pub references: Vec<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

///
/// Certification
///
/// Repeating element; each one owns its own reference list.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issued_by: String,
    pub references: Vec<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Certification {
    #[must_use]
    pub fn new(name: impl Into<String>, issued_by: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issued_by: issued_by.into(),
            references: Vec::new(),
            extra: Map::new(),
        }
    }
}
