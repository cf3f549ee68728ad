//! Lazy reactive primitives
//!
//! - [`Stream`] / [`Emitter`]: push-only events, no retained value
//! - [`Subject`]: a value materialized while observed, forgotten when not
//! - [`Value`] / [`Mutable`]: an always-readable current value with
//!   equality-gated change dispatch and derivation combinators
//!
//! Every primitive is dormant until its first listener arrives and goes
//! dormant again, synchronously, when its last listener is removed.
//! Everything here is single-threaded; handles are cheap `Rc` clones.

pub mod eq;
mod error;
pub mod listeners;
mod mutable;
mod node;
mod remover;
mod stream;
mod subject;
mod value;
mod when;

pub use eq::{data_equals, never_equals, ptr_equals, EqFn};
pub use error::{BoxError, ListenResult, MultiError, ReactError};
pub use listeners::{ListenerId, Listeners};
pub use mutable::Mutable;
pub use node::Dispatcher;
pub use remover::Remover;
pub use stream::{Emitter, Stream};
pub use subject::Subject;
pub use value::Value;
pub use when::When;
