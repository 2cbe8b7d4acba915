#![forbid(unsafe_code)]

//! Core primitives for the reflow responsive-layout checker.
//!
//! Design goals:
//! - deterministic, testable geometry (no panics on browser-supplied boxes)
//! - a width-interval algebra small enough to audit by hand
//! - an explicit, immutable configuration threaded through every consumer

pub mod config;
pub mod driver;
pub mod error;
pub mod range;
pub mod rect;
pub mod scripted;

pub use config::{Config, RepairStrategy};
pub use driver::{ElementSample, RawBox, RepairHandle, Snapshot, WebDriver};
pub use error::{Error, Result};
pub use range::{Range, RangeSet};
pub use rect::{CollisionClear, Protrusion, Rectangle};
pub use scripted::ScriptedDriver;
