pub mod analyzer;
pub mod chef_card;
pub mod identity;
pub mod matcher;
pub mod metrics;
pub mod providers;
pub mod store;
pub mod tokenizer;

pub use identity::IdentityVerifier;
pub use providers::TextProvider;
pub use store::{DocumentStore, MemoryStore, MongoStore};
pub use tokenizer::{RuleTokenizer, Tokenizer};
