pub mod chat_llm;
pub mod transcribe;

pub use chat_llm::ChatCompletionAdapter;
pub use transcribe::WhisperTranscriptionAdapter;
