#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use routewise_core::loading::build_street_graph;
use routewise_core::loading::osm::raw_types::{OsmElement, OsmTags};
use routewise_core::prelude::*;

pub const ORIGIN_LAT: f64 = 12.97;
pub const ORIGIN_LON: f64 = 77.59;
const STEP: f64 = 0.001;

fn node(id: NodeId, lat: f64, lon: f64) -> OsmElement {
    OsmElement {
        elem_type: "node".to_string(),
        id,
        lat: Some(lat),
        lon: Some(lon),
        nodes: None,
        tags: None,
    }
}

fn way(id: NodeId, nodes: Vec<NodeId>, highway: &str, oneway: bool) -> OsmElement {
    OsmElement {
        elem_type: "way".to_string(),
        id,
        lat: None,
        lon: None,
        nodes: Some(nodes),
        tags: Some(OsmTags {
            highway: Some(highway.to_string()),
            oneway: oneway.then(|| "yes".to_string()),
            junction: None,
        }),
    }
}

/// 3x3 street grid with node ids 1..=9 (row-major, south-west first) and a
/// detached one-way segment 50 -> 51 two kilometres north
pub fn grid_elements() -> Vec<OsmElement> {
    let mut elements = Vec::new();
    for row in 0..3 {
        for col in 0..3 {
            let id = row * 3 + col + 1;
            elements.push(node(
                id,
                ORIGIN_LAT + row as f64 * STEP,
                ORIGIN_LON + col as f64 * STEP,
            ));
        }
    }
    elements.push(node(50, ORIGIN_LAT + 0.02, ORIGIN_LON));
    elements.push(node(51, ORIGIN_LAT + 0.02, ORIGIN_LON + STEP));

    elements.push(way(1000, vec![1, 2, 3], "residential", false));
    elements.push(way(1001, vec![4, 5, 6], "residential", false));
    elements.push(way(1002, vec![7, 8, 9], "residential", false));
    elements.push(way(1003, vec![1, 4, 7], "primary", false));
    elements.push(way(1004, vec![2, 5, 8], "tertiary", false));
    elements.push(way(1005, vec![3, 6, 9], "primary", false));
    elements.push(way(1006, vec![50, 51], "service", true));
    elements
}

pub fn grid_graph() -> StreetGraph {
    build_street_graph(&grid_elements()).expect("grid fixture is valid")
}

pub fn grid_point(row: usize, col: usize) -> LatLon {
    LatLon::new(
        ORIGIN_LAT + row as f64 * STEP,
        ORIGIN_LON + col as f64 * STEP,
    )
}

/// Provider serving the grid fixture and counting fetches
#[derive(Clone, Default)]
pub struct FakeProvider {
    pub fetches: Arc<AtomicUsize>,
    pub delay: Duration,
    pub fail: bool,
}

impl FakeProvider {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl GraphProvider for FakeProvider {
    fn fetch_graph(&self, _area: &SearchArea) -> Result<StreetGraph, Error> {
        thread::sleep(self.delay);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::NetworkError("provider unreachable".to_string()));
        }
        build_street_graph(&grid_elements())
    }
}

/// Directory storage counting successful reads and writes
#[derive(Clone)]
pub struct CountingStorage {
    pub inner: DirectoryStorage,
    pub reads: Arc<AtomicUsize>,
    pub writes: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn new(inner: DirectoryStorage) -> Self {
        Self {
            inner,
            reads: Arc::default(),
            writes: Arc::default(),
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CacheStorage for CountingStorage {
    fn read(&self, key: &CacheKey) -> io::Result<Option<Vec<u8>>> {
        let bytes = self.inner.read(key)?;
        if bytes.is_some() {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(bytes)
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
        self.inner.write(key, bytes)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
