// Application lifecycle: status set, transition rules, and the status
// endpoint that enforces them.

pub mod handlers;
pub mod status;
