pub mod client;
pub mod consensus;
pub mod registry;

pub use client::HttpChainFetcher;
pub use consensus::{ReplacementOutcome, resolve};
pub use registry::NodeRegistry;
