//! A deterministic, in-memory [`WebDriver`] backed by scripted per-width
//! geometry tables.
//!
//! Protocol tests (classification probing, repair confirmation) need a driver
//! whose answers are exact and replayable; this is that driver. When at least
//! one repair is injected, the scripted "repaired" page tables take over, so a
//! test can model a repair that actually fixes the layout.

use std::collections::BTreeMap;

use crate::driver::{ElementSample, RawBox, RepairHandle, Snapshot, WebDriver};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct ScriptedDriver {
    current_width: i32,
    pages: BTreeMap<i32, Vec<ElementSample>>,
    repaired_pages: BTreeMap<i32, Vec<ElementSample>>,
    styles: BTreeMap<String, BTreeMap<String, String>>,
    active_repairs: BTreeMap<u64, String>,
    next_handle: u64,
    /// Every CSS text ever injected, in order, for assertions.
    pub injected: Vec<String>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the page at one width.
    pub fn page(&mut self, width: i32, elements: Vec<ElementSample>) -> &mut Self {
        self.pages.insert(width, elements);
        self
    }

    /// Script the page seen at one width while a repair is injected.
    pub fn repaired_page(&mut self, width: i32, elements: Vec<ElementSample>) -> &mut Self {
        self.repaired_pages.insert(width, elements);
        self
    }

    pub fn style(&mut self, path: &str, properties: &[(&str, &str)]) -> &mut Self {
        let map = self.styles.entry(path.to_string()).or_default();
        for (k, v) in properties {
            map.insert((*k).to_string(), (*v).to_string());
        }
        self
    }

    pub fn repair_active(&self) -> bool {
        !self.active_repairs.is_empty()
    }

    fn elements(&self) -> Result<&[ElementSample]> {
        let table = if self.repair_active() && self.repaired_pages.contains_key(&self.current_width)
        {
            &self.repaired_pages
        } else {
            &self.pages
        };
        table
            .get(&self.current_width)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::driver(format!("no scripted page at width {}", self.current_width))
            })
    }
}

impl WebDriver for ScriptedDriver {
    fn set_viewport(&mut self, width: i32, _height: i32) -> Result<()> {
        self.current_width = width;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot {
            width: self.current_width,
            elements: self.elements()?.to_vec(),
        })
    }

    fn rectangle(&mut self, path: &str) -> Result<Option<RawBox>> {
        Ok(self
            .elements()?
            .iter()
            .find(|e| e.path == path)
            .and_then(|e| e.raw))
    }

    fn computed_style(&mut self, path: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.styles.get(path).cloned().unwrap_or_default())
    }

    fn children(&mut self, path: &str) -> Result<Vec<String>> {
        let prefix_len = path.len();
        Ok(self
            .elements()?
            .iter()
            .filter(|e| {
                e.path.len() > prefix_len + 1
                    && e.path.starts_with(path)
                    && e.path.as_bytes()[prefix_len] == b'/'
                    && !e.path[prefix_len + 1..].contains('/')
            })
            .map(|e| e.path.clone())
            .collect())
    }

    fn add_repair(&mut self, css: &str) -> Result<RepairHandle> {
        self.next_handle += 1;
        self.active_repairs.insert(self.next_handle, css.to_string());
        self.injected.push(css.to_string());
        Ok(RepairHandle(self.next_handle))
    }

    fn remove_repair(&mut self, handle: RepairHandle) -> Result<()> {
        if self.active_repairs.remove(&handle.0).is_none() {
            return Err(Error::driver(format!("unknown repair handle {}", handle.0)));
        }
        Ok(())
    }
}
