// The orchestration layer: the per-notification pipeline and the
// process-wide automation switch it is controlled by.

pub mod pipeline;
pub mod poller;
pub mod switch;

pub use pipeline::Pipeline;
pub use switch::AutomationSwitch;
