#![allow(dead_code)]

use refbind::prelude::*;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn date(raw: &str) -> DateObtained {
    DateObtained::parse_flexible(raw).expect("fixture date should parse")
}

pub fn source(reference_type: ReferenceType) -> Source {
    Source::new(reference_type, date("2022-11-11"))
}

pub fn reference(field: &str, content: &str, sources: Vec<Source>) -> Reference {
    Reference {
        field: field.to_string(),
        content: content.to_string(),
        sources,
    }
}

pub fn record() -> CareerRecord {
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

pub fn editor(record: &CareerRecord) -> ReferenceEditor {
    ReferenceEditor::from_record(record).expect("record should load")
}

pub fn current(editor: &ReferenceEditor) -> CareerRecord {
    editor.form().to_record().expect("record should decode")
}
