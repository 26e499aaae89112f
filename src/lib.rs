// respectrewrite: toxicity gate and strict-format harm explanations.
//
// This is the library root. The moderation core is toxicity (the gate),
// generation (the explanation call), format (the deterministic repair) and
// pipeline (the composition). web is the HTTP surface.

pub mod config;
pub mod error;
pub mod format;
pub mod generation;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod toxicity;

#[cfg(feature = "web")]
pub mod web;
