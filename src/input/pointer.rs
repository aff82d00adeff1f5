//! Outside-interaction detection against placed screen regions.
//!
//! Regions are named by an opaque [`RegionRef`] and placed on screen by the
//! layout pass ([`Regions::place`]). The [`OutsideDetector`] holds watches on
//! regions; every pointer-down is tested against each watched region and the
//! watch's payload is reported when the point falls outside it.
//!
//! A region that has not been placed (nothing rendered yet, or the layout
//! dropped it) is a missing reference: its watches report nothing.

use std::collections::HashMap;

/// Zero-based cell position within the plugin pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangle of cells, zero-based, exclusive on the far edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

impl Rect {
    #[must_use]
    pub const fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self { row, col, height, width }
    }

    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.row >= self.row
            && point.row < self.row + self.height
            && point.col >= self.col
            && point.col < self.col + self.width
    }

    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.row + self.height
    }
}

/// Opaque handle naming a screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionRef(pub u32);

/// Placement of every region laid out by the last render.
#[derive(Debug, Clone, Default)]
pub struct Regions {
    placed: HashMap<RegionRef, Rect>,
}

impl Regions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, region: RegionRef, rect: Rect) {
        self.placed.insert(region, rect);
    }

    pub fn clear(&mut self) {
        self.placed.clear();
    }

    #[must_use]
    pub fn rect(&self, region: RegionRef) -> Option<Rect> {
        self.placed.get(&region).copied()
    }

    /// Whether `point` lies in `region`; `None` if the region is not placed.
    #[must_use]
    pub fn contains(&self, region: RegionRef, point: Point) -> Option<bool> {
        self.rect(region).map(|rect| rect.contains(point))
    }
}

/// Handle for revoking a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

#[derive(Debug, Clone)]
struct Watch<T> {
    id: WatchId,
    region: RegionRef,
    payload: T,
}

/// Reports pointer-downs that land outside watched regions.
#[derive(Debug, Clone)]
pub struct OutsideDetector<T> {
    watches: Vec<Watch<T>>,
    next_id: u64,
}

impl<T> Default for OutsideDetector<T> {
    fn default() -> Self {
        Self {
            watches: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> OutsideDetector<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch(&mut self, region: RegionRef, payload: T) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        tracing::debug!(watch = id.0, region = region.0, "outside-interaction watch registered");
        self.watches.push(Watch { id, region, payload });
        id
    }

    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| w.id != id);
        before != self.watches.len()
    }

    pub fn clear(&mut self) {
        self.watches.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Tests one pointer-down against every watch, returning the payloads of
    /// the watches it landed outside of.
    pub fn pointer_down(&self, point: Point, regions: &Regions) -> Vec<T> {
        self.watches
            .iter()
            .filter(|watch| match regions.contains(watch.region, point) {
                Some(inside) => !inside,
                None => {
                    tracing::trace!(region = watch.region.0, "region not placed, ignoring pointer");
                    false
                }
            })
            .map(|watch| watch.payload.clone())
            .collect()
    }
}
