//! `submit_patient_registration` hands a confirmed record to the desk.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::ToolError;
use crate::registration::model::{Address, PatientInformation, PatientRecord};
use crate::registration::RegistrationDesk;

use super::tool::{Tool, ToolOutput};

const TOOL_NAME: &str = "submit_patient_registration";

/// Submits the patient's confirmed registration to the records system.
///
/// The model should call this once, after reading the collected details
/// back to the patient and getting a yes.
pub struct SubmitRegistrationTool {
    desk: Arc<RegistrationDesk>,
}

impl SubmitRegistrationTool {
    pub fn new(desk: Arc<RegistrationDesk>) -> Self {
        Self { desk }
    }
}

fn string_properties(names: &[&str]) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .map(|name| (name.to_string(), serde_json::json!({ "type": "string" })))
        .collect();
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": names,
    })
}

fn invalid(reason: impl Into<String>) -> ToolError {
    ToolError::InvalidParameters {
        name: TOOL_NAME.to_string(),
        reason: reason.into(),
    }
}

#[async_trait]
impl Tool for SubmitRegistrationTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Submit the patient's registration to the medical records system. Call this \
         exactly once, after every detail has been collected and the patient has \
         confirmed it. Returns success, or an error with isNetworkError set when the \
         records system could not be reached."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let info: Vec<&str> = PatientInformation::default()
            .fields()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        let address: Vec<&str> = Address::default()
            .fields()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        let mut properties = serde_json::Map::new();
        properties.insert(PatientInformation::SECTION.to_string(), string_properties(&info));
        properties.insert(Address::SECTION.to_string(), string_properties(&address));
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": [PatientInformation::SECTION, Address::SECTION]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        for section in [PatientInformation::SECTION, Address::SECTION] {
            if !params.get(section).is_some_and(|v| v.is_object()) {
                return Err(invalid(format!("{section} must be an object")));
            }
        }
        let record: PatientRecord =
            serde_json::from_value(params).map_err(|e| invalid(e.to_string()))?;

        let (registration_id, outcome) = self.desk.register(record).await;
        let mut result =
            serde_json::to_value(outcome.to_response()).map_err(|e| ToolError::ExecutionFailed {
                name: TOOL_NAME.to_string(),
                reason: format!("could not encode outcome: {e}"),
            })?;
        if let (Some(id), Some(obj)) = (registration_id, result.as_object_mut()) {
            obj.insert(
                "registrationId".to_string(),
                serde_json::Value::String(id.to_string()),
            );
        }

        Ok(ToolOutput::success(result, start.elapsed()))
    }
}
