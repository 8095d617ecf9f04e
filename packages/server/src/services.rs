pub mod broker;
pub mod day_phase;
pub mod election;
pub mod game_service;
pub mod night_phase;
pub mod orchestrator;

pub use broker::{ActionBroker, BrokerError, NullBroker};
pub use orchestrator::{OrchestratorOptions, PhaseOrchestrator};
