//! Organizer engine: the classify-and-copy pipeline and its caller-facing hooks

mod organizer;
mod progress;
mod sink;
mod state;
mod stop;

pub use organizer::Organizer;
pub use progress::{
    Phase, ProgressCallback, ProgressUpdate, LABEL_CANCELLED, LABEL_COMPLETED, SCAN_LABEL_PREFIX,
};
pub use sink::{MemorySink, MessageLevel, MessageSink, TracingSink};
pub use state::EngineState;
pub use stop::StopHandle;
