pub mod course;
pub mod llm;
pub mod logging;
pub mod progress;
pub mod voice;
