//! Tessera Core
//!
//! The reactive foundation of the Tessera scene framework. Application
//! state, derived state and host event sources are all expressed with the
//! primitives in [`react`]; the input layer and widgets consume them.
//!
//! # Example
//!
//! ```rust
//! use tessera_core::react::Mutable;
//!
//! let count = Mutable::local(1);
//! let doubled = count.map(|v| v * 2);
//!
//! let remover = doubled
//!     .on_change(|new, old| {
//!         println!("doubled: {old} -> {new}");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! count.update(5).unwrap();
//! assert_eq!(doubled.current(), 10);
//! remover.remove();
//! ```

pub mod react;

pub use react::{
    Dispatcher, Emitter, EqFn, ListenResult, Mutable, ReactError, Remover, Stream, Subject,
    Value, When,
};
