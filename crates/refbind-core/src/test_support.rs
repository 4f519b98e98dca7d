use crate::model::{
    Appointment, CareerRecord, Certification, DateObtained, Reference, ReferenceType, Source,
};

/// Date used by every fixture Source.
pub(crate) const FIXTURE_DATE: &str = "2022-11-11";

pub(crate) fn date() -> DateObtained {
    DateObtained::parse_flexible(FIXTURE_DATE).expect("fixture date should parse")
}

pub(crate) fn source(reference_type: ReferenceType) -> Source {
    Source::new(reference_type, date())
}

pub(crate) fn reference(field: &str, content: &str, sources: Vec<Source>) -> Reference {
    Reference {
        field: field.to_string(),
        content: content.to_string(),
        sources,
    }
}

/// Record with every partition present, no References, and four
/// certifications.
pub(crate) fn career_record() -> CareerRecord {
    CareerRecord {
        company: "Acme Shipyards".to_string(),
        duration: "2019-2022".to_string(),
        last_drawn_salary: "5400".to_string(),
        appointment: Appointment {
            position: "Foreman".to_string(),
            rank: "Senior".to_string(),
            ..Appointment::default()
        },
        skills: vec!["Welding".to_string(), "Rigging".to_string()],
        references: Vec::new(),
        certifications: vec![
            Certification::new("Rigging Level 1", "Harbour Authority"),
            Certification::new("Confined Space", "SafeWork"),
            Certification::new("Forklift", "Transport Board"),
            Certification::new("First Aid", "Red Cross"),
        ],
        ..CareerRecord::default()
    }
}
