//! guide-core: Rwanda travel guide core library.
//!
//! Holds the read-only knowledge base, the keyword resolver that answers from it,
//! the responder capability (rule-based or generative) and per-session chat history.

mod knowledge;
mod resolver;
mod responder;
mod session;
mod shared;

// Shared
pub use shared::{ChatTurn, GuideConfig, Role, HISTORY_WINDOW};

// Knowledge base
pub use knowledge::{Highlight, KnowledgeBase, KnowledgeError, HIGHLIGHT_ANCHORS, ITINERARY_KEYS, REQUIRED_FAQ_TOPICS};

// Resolver
pub use resolver::{resolve, DEFAULT_REPLY};

// Responders
pub use responder::{select_responder, GenerativeError, GenerativeResponder, Responder, RuleBasedResponder, SYSTEM_PROMPT};

// Sessions
pub use session::{SessionError, SessionSigner, SessionStore};
