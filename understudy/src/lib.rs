#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Understudy
//!
//! Test doubles for Rust: stand-ins that record every call, answer with
//! stubbed behavior chosen by argument matchers, and verify afterwards how
//! often and in which order they were called.
//!
//! ## Quick Start
//!
//! ```rust
//! use understudy::*;
//!
//! fn main() -> Result {
//!     let session = Session::default();
//!     let obj = session.double(Template::new("obj").method("greeting").method("farewell"))?;
//!
//!     when(&obj).call("greeting", args![])?.then_return("hello");
//!
//!     // Code under test
//!     assert_eq!(obj.call("greeting", args![])?, Value::from("hello"));
//!     obj.call("farewell", args!["hunter", "thompson"])?;
//!
//!     verify(&obj).call("greeting", args![])?;
//!     verify(&obj).call("farewell", args!["hunter", anything()])?;
//!     verify_no_more_interactions(&obj)
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Owns the invocation order; creates doubles, functions and sequences |
//! | [`Template`] | The interface a double is built from |
//! | [`Double`] | A stand-in object made of mock functions |
//! | [`MockFunction`] | A callable stand-in with a call log and stubs |
//! | [`Value`] | A dynamically typed argument, receiver or result |
//! | [`Matcher`] | A described predicate over one value |
//! | [`Interaction`] | One recorded call |
//! | [`Sequence`] | A cursor for in-order verification |
//! | [`Error`] | Every failure, including structured verification mismatches |
//!
//! ## Stubbing
//!
//! [`when`] selects a member; its argument list mixes literals and matchers.
//! The most recent matching stub answers a call:
//!
//! ```rust,ignore
//! when(&obj).call("farewell", args![anything()])?.then_return("bye");
//! when(&obj).call("farewell", args!["hunter"])?.then(|_this, args| args[0].clone());
//! ```
//!
//! ## Verification
//!
//! - [`verify`] / [`verify_with`] with [`once`], [`times`], [`never`]
//! - [`Sequence::at_least`] for cross-double call order
//! - [`verify_zero_interactions`] and [`verify_no_more_interactions`]
//!
//! Failures are returned as [`Error`] values whose `Display` lists every
//! recorded interaction, so `?` in a test prints a useful report.
//!
//! ## Features
//!
//! - **`serde`** - Serialization of values and interactions, and `Session::to_json()`
//!
//! ## Examples
//!
//! See the `examples/` directory of the crate:
//!
//! - `greeter.rs`  - Stubbing, spying and in-order verification

mod config;
mod double;
mod double_builder;
mod double_config;
mod error;
mod failure;
mod interaction;
mod interaction_log;
mod macros;
mod matcher;
mod member_id;
mod mock_function;
mod object_id;
mod sequence;
mod session;
mod stub;
mod template;
mod value;
mod verification;
mod verifier;

pub use config::Config;
pub use double::Double;
pub use double_builder::DoubleBuilder;
pub use double_config::DoubleConfig;
pub use error::Error;
pub use failure::{
    CountFailure, CountMismatch, RemainingInteractions, SequenceFailure, SequenceMismatch,
    WantedCall,
};
pub use interaction::{Interaction, InvocationOrder};
pub use interaction_log::InteractionLog;
pub use matcher::{
    ArgMatchers, Matcher, anything, equal_to, greater_than, less_than, not, same_as,
};
pub use member_id::MemberId;
pub use mock_function::MockFunction;
pub use object_id::{ObjectId, ObjectRef};
pub use sequence::{InSequence, Sequence};
pub use session::Session;
pub use stub::{Behavior, StubAction, StubBuilder};
pub use template::{NativeShape, Template};
pub use value::Value;
pub use verification::{Verification, When, verify, verify_with, when};
pub use verifier::{
    Mock, Times, Verifier, never, once, times, verify_no_more_interactions,
    verify_zero_interactions,
};

pub(crate) use stub::StubTable;

/// Convenience alias for `Result<T, understudy::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
