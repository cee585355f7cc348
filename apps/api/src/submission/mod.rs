// Submission workflow: payload construction, the submission state machine,
// and the coordinator that ties them to the processing client.

pub mod coordinator;
pub mod payload;
pub mod state;
