pub mod gemini;
pub mod service;
