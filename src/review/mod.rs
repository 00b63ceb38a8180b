pub mod orchestrator;

pub use orchestrator::{AnalysisMode, ReviewOrchestrator};
