//! Core library for the `explorer` travel brief CLI.
//!
//! This crate defines:
//! - The instruction sent to a search-grounded generative backend
//! - The Gemini provider and the provider abstraction
//! - The markdown parser turning replies into typed travel data
//! - Configuration & credentials handling
//!
//! It is used by `explorer-cli`, but can also be reused by other binaries or services.

pub mod brief;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod provider;

pub use brief::fetch_brief;
pub use config::Config;
pub use error::{TravelError, TravelResult};
pub use model::{
    AqiData, GroundingChunk, GroundingSource, Place, ProviderResponse, TravelBrief, TravelInfo,
    WeatherData,
};
pub use parser::parse_travel_info;
pub use provider::{TravelProvider, provider_from_config};
