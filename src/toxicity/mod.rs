// Toxicity scoring: the fast local gate in front of the generation stage.
//
// ToxicityScorer is the classifier capability. OnnxToxicityScorer runs
// Detoxify's unbiased-toxic-roberta in-process, so the gate never makes an
// outbound call. ToxicityGate applies the threshold and is the only part of
// the pipeline that talks to a scorer.

pub mod download;
pub mod gate;
pub mod onnx;
pub mod traits;
