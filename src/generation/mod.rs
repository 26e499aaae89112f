// Explanation generation: the expensive stage, run only for toxic text.
//
// TextGenerator is the hosted generation capability (GroqClient in
// production, scripted stubs in tests). ExplanationGenerator owns the
// instruction template and sampling parameters and turns any capability
// failure into the fixed fallback explanation.

pub mod explainer;
pub mod groq;
pub mod prompt;
pub mod traits;
