//! Card system: definitions, runtime instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (stats, keywords, costs, effects)
//! - `RuntimeCard`: In-match instance with its own mutable stats
//! - `CardRegistry`: Shared definition lookup by id and name

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardTypeId, KeywordId, KeywordValueId};
pub use instance::{RuntimeCard, RuntimeKeyword};
pub use registry::CardRegistry;
