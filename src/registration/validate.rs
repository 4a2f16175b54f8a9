//! Completeness check run before any record leaves the process.

use super::model::{Address, PatientInformation, PatientRecord};

/// Return the dotted path of every blank field in `record`.
///
/// A field is blank when it is empty after trimming whitespace. Paths come
/// out in declaration order: all `PatientInformation.*` fields first, then
/// `Address.*`. An empty result means the record may be submitted.
pub fn validate(record: &PatientRecord) -> Vec<String> {
    let info = record
        .patient_information
        .fields()
        .into_iter()
        .map(|field| (PatientInformation::SECTION, field));
    let address = record
        .address
        .fields()
        .into_iter()
        .map(|field| (Address::SECTION, field));

    info.chain(address)
        .filter(|(_, (_, value))| value.trim().is_empty())
        .map(|(section, (name, _))| format!("{section}.{name}"))
        .collect()
}

/// Human-readable summary of missing fields, for relaying to the caller.
pub fn describe_missing(missing: &[String]) -> String {
    format!("Missing required fields: {}", missing.join(", "))
}
