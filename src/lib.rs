//! # tablescout
//!
//! Grounded restaurant discovery over the Gemini API.
//!
//! A search takes user criteria, runs one `generateContent` call with the
//! Google Maps grounding tool, and reconciles the model's markdown answer
//! with the returned place citations into structured restaurant records.
//! The reconciliation is a pure function over the response, so it can be
//! exercised with fixture text without a live model.

mod client;
mod content_builder;
mod criteria;
mod error;
mod models;
mod parse;
mod search;
mod state;
mod tools;


pub use client::Gemini;
pub use content_builder::ContentBuilder;
pub use criteria::{SearchCriteria, AREAS, BUDGETS, CUISINES, PURPOSES};
pub use error::{Error, Result};
pub use models::{
    Candidate, Content, FinishReason, GenerateContentRequest, GenerationConfig,
    GenerationResponse, GroundingChunk, GroundingMetadata, MapsChunk, Message, Part,
    PlaceAnswerSources, ReviewSnippet, Role, UsageMetadata, WebChunk,
};
pub use parse::{
    assemble, place_references, RestaurantRecord, DEFAULT_BUDGET, DEFAULT_FEATURES,
    DEFAULT_RATING, NO_DESCRIPTION,
};
pub use search::{RestaurantSearch, SYSTEM_INSTRUCTION};
pub use state::{SearchPhase, SearchSession, SearchToken};
pub use tools::{GoogleMapsConfig, LatLng, RetrievalConfig, Tool, ToolConfig};
