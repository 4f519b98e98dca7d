mod career;
mod reference;
mod source;

pub use career::{Appointment, CareerRecord, Certification};
pub use reference::Reference;
pub use source::{DateObtained, ReferenceType, Source, SourceDraft};
