//! Patient registration: the record the dialogue collects and the gate
//! that hands it to the records API.
//!
//! The conversational layer assembles a `PatientRecord` turn by turn. Once
//! the patient confirms it, the record is opened on the `RegistrationDesk`
//! and submitted exactly once.

pub mod desk;
pub mod model;
pub mod routes;
pub mod state;
pub mod validate;

pub use desk::RegistrationDesk;
pub use model::{Address, PatientInformation, PatientRecord};
pub use routes::{RegistrationRouteState, registration_routes};
pub use state::{RegistrationPhase, RegistrationState};
pub use validate::validate;
