//! Contract with the browser-automation collaborator.
//!
//! Everything behind this trait may fail (network or render timing), so every
//! method returns `Result`. A `None` box is normal and degrades to the
//! [`Rectangle`](crate::Rectangle) sentinel; it must never surface as an error
//! from graph construction.
//!
//! All calls share one mutable browser viewport, which is why the trait is
//! synchronous and callers are strictly sequential: resize, probe, and repair
//! injection are the only suspension points of the whole pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw box as reported by the browser (CSS pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One rendered element at one width: its structural path plus its box, if the
/// browser could produce one.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSample {
    pub path: String,
    pub raw: Option<RawBox>,
}

impl ElementSample {
    pub fn new(path: impl Into<String>, raw: Option<RawBox>) -> Self {
        Self {
            path: path.into(),
            raw,
        }
    }
}

/// Flat capture of every live, visible, eligible element at one width.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: i32,
    pub elements: Vec<ElementSample>,
}

/// Token for an injected repair stylesheet; paired with `remove_repair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepairHandle(pub u64);

pub trait WebDriver {
    fn set_viewport(&mut self, width: i32, height: i32) -> Result<()>;

    /// Capture every eligible element at the current viewport width.
    fn snapshot(&mut self) -> Result<Snapshot>;

    /// Box for one element, `Ok(None)` when it has no renderable box.
    fn rectangle(&mut self, path: &str) -> Result<Option<RawBox>>;

    /// Full computed style of one element, property name to value.
    fn computed_style(&mut self, path: &str) -> Result<BTreeMap<String, String>>;

    /// Structural paths of the element's children.
    fn children(&mut self, path: &str) -> Result<Vec<String>>;

    fn add_repair(&mut self, css: &str) -> Result<RepairHandle>;

    fn remove_repair(&mut self, handle: RepairHandle) -> Result<()>;
}
