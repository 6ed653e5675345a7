//! Narrative risk assessment: remote providers, local fallback and the
//! character-stream reveal.

pub mod config;
mod fallback;
mod prompt;
mod provider;
mod providers;
mod router;
pub mod stream;
pub mod types;

pub use config::AiSettings;
pub use fallback::{FALLBACK_PREAMBLE, fallback_report};
pub use provider::{NarrativeFuture, NarrativeProvider};
pub use providers::{gemini::GeminiProvider, service::ServiceProvider};
pub use router::Advisor;
pub use stream::{DisplaySurface, SurfaceHook, SurfaceUpdate, TextReveal, Typewriter};
pub use types::{Advisory, AdvisorySource, AiMode};
