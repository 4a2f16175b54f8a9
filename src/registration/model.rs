//! Patient record data models.
//!
//! Field names on the wire are PascalCase and must match the records API
//! exactly, so every struct pins its serde names.

use serde::{Deserialize, Serialize};

/// Demographic and contact details for one patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct PatientInformation {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    #[serde(rename = "SSN")]
    pub ssn: String,
    #[serde(rename = "EmailID")]
    pub email_id: String,
    pub marital_status: String,
    pub phone_number: String,
}

impl PatientInformation {
    /// Section name used as the prefix of field paths.
    pub const SECTION: &'static str = "PatientInformation";

    /// Wire name and value of every field, in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("FirstName", self.first_name.as_str()),
            ("LastName", self.last_name.as_str()),
            ("DateOfBirth", self.date_of_birth.as_str()),
            ("SSN", self.ssn.as_str()),
            ("EmailID", self.email_id.as_str()),
            ("MaritalStatus", self.marital_status.as_str()),
            ("PhoneNumber", self.phone_number.as_str()),
        ]
    }
}

/// Postal address of the patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    /// Address kind as the records API names it, e.g. "Home" or "Work".
    #[serde(rename = "Type")]
    pub address_type: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    pub const SECTION: &'static str = "Address";

    /// Wire name and value of every field, in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Type", self.address_type.as_str()),
            ("AddressLine1", self.address_line1.as_str()),
            ("City", self.city.as_str()),
            ("State", self.state.as_str()),
            ("Country", self.country.as_str()),
            ("ZipCode", self.zip_code.as_str()),
        ]
    }
}

/// A complete registration payload: patient details plus address.
///
/// Built once per registration by the dialogue layer and handed to the
/// submission pipeline as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct PatientRecord {
    pub patient_information: PatientInformation,
    pub address: Address,
}

impl PatientRecord {
    pub fn new(patient_information: PatientInformation, address: Address) -> Self {
        Self {
            patient_information,
            address,
        }
    }
}
