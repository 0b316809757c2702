//! Agents for Parley.
//!
//! - `Agent` / `BoxAgent`: the single-operation chat contract and its
//!   type-erased wrapper
//! - `AgentRegistryBuilder` / `AgentRegistry`: name-indexed agent factories
//! - `EchoAgent`: deterministic variant with no backend
//! - `LlmAgent`: language-model-backed variant with conversation memory
//! - `tools` / `roles`: tool allow-lists and specialized role prompts

pub mod capability;
pub mod echo;
pub mod llm_agent;
pub mod registry;
pub mod roles;
pub mod tools;

pub use capability::{Agent, BoxAgent};
pub use echo::EchoAgent;
pub use llm_agent::{AgentProfile, LlmAgent, EMPTY_RESPONSE_REPLY};
pub use registry::{AgentFactory, AgentRegistry, AgentRegistryBuilder, FactoryArgs};
