//! Synthesis: reducing the insights of many engines into one answer.

pub mod strategy;
pub mod synthesizer;

pub use strategy::SynthesisStrategy;
pub use synthesizer::{
    CONSENSUS_BOOST, CONSENSUS_VARIANCE_THRESHOLD, SYNTHESIS_ENGINE_ID, confidence_variance,
    dialectic_pair, synthesize,
};
