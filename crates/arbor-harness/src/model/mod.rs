//! Reference model for model-based testing.
//!
//! The model captures what each capability is allowed to evaluate and what
//! the outputs must be, without any range decomposition. It serves as the
//! oracle against which the real implementation is verified.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Independence: outputs come from a naive root-to-leaf walk
//! - Deterministic: same inputs produce same outputs

pub mod operation;
mod world;

pub use operation::{
    HandleId, ModelLeaf, OUTPUT_LEN, Operation, OperationError, OperationResult,
};
pub use world::{ModelHandle, ModelWorld};
