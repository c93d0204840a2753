//! Agent System
//!
//! The chatbot runs a single agent per turn:
//!
//! ```text
//! User Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Reply     │  → Gemini answer (+ chart on "visualize")
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//!  Transcript
//! ```

pub mod reply;

pub use reply::{Reply, ReplyAgent};
