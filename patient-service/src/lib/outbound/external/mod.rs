pub mod patient_source;

pub use patient_source::HttpPatientSource;
