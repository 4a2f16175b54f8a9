//! Shared fixtures for integration tests.

use std::time::Duration;

use patient_intake::config::RetryPolicy;
use patient_intake::registration::{Address, PatientInformation, PatientRecord};

/// A record with every field filled in.
pub fn complete_record() -> PatientRecord {
    PatientRecord::new(
        PatientInformation {
            first_name: "Ana".to_string(),
            last_name: "Ortiz".to_string(),
            date_of_birth: "1979-11-02".to_string(),
            ssn: "987-65-4320".to_string(),
            email_id: "ana.ortiz@example.org".to_string(),
            marital_status: "Single".to_string(),
            phone_number: "555-0199".to_string(),
        },
        Address {
            address_type: "Home".to_string(),
            address_line1: "400 Harbor Way".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            country: "USA".to_string(),
            zip_code: "97201".to_string(),
        },
    )
}

/// Fast policy so retry tests do not sleep for seconds.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        attempt_timeout: Duration::from_millis(300),
        base_backoff: Duration::from_millis(10),
    }
}
