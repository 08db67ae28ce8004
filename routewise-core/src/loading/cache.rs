//! On-disk graph cache with per-key single-flight loading
//!
//! Keys round the center to 4 decimal places (~11 m of latitude) and keep the
//! radius in whole meters. Two requests whose centers differ by less than the
//! rounding step share one cached graph; this is an accepted approximation,
//! the shared graph may be centered up to ~6 m away from either request.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::{error, info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use super::osm::GraphProvider;
use super::{RouteConfig, SearchArea};
use crate::model::{RoadClass, StreetEdge, StreetGraph, StreetNode};
use crate::{Error, LatLon, Meters, NodeId};

/// Decimal places kept from the center coordinates
pub const CACHE_KEY_PRECISION: u32 = 4;
const CACHE_KEY_SCALE: f64 = 10_000.0;

/// Bump when the serialized layout changes; older files are re-fetched
const CACHE_VERSION: u32 = 1;

/// Rounded `(center, radius)` identifying a reusable graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
    radius_m: u32,
}

impl CacheKey {
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(center: LatLon, radius_m: u32) -> Self {
        Self {
            lat_e4: (center.lat * CACHE_KEY_SCALE).round() as i64,
            lon_e4: (center.lon * CACHE_KEY_SCALE).round() as i64,
            radius_m,
        }
    }

    pub fn from_area(area: &SearchArea) -> Self {
        Self::new(area.center, area.radius_m)
    }

    /// Rounded center the key stands for
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> LatLon {
        LatLon::new(
            self.lat_e4 as f64 / CACHE_KEY_SCALE,
            self.lon_e4 as f64 / CACHE_KEY_SCALE,
        )
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Filesystem-safe name, e.g. `graph_12.9700_77.5900_3000.json`
    pub fn file_name(&self) -> String {
        let center = self.center();
        format!(
            "graph_{:.4}_{:.4}_{}.json",
            center.lat, center.lon, self.radius_m
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let center = self.center();
        write!(f, "({:.4}, {:.4}) r={}m", center.lat, center.lon, self.radius_m)
    }
}

/// Byte-level durable storage addressed by cache key
pub trait CacheStorage: Send + Sync {
    /// `Ok(None)` when nothing is stored under the key
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if an existing entry cannot be read
    fn read(&self, key: &CacheKey) -> io::Result<Option<Vec<u8>>>;

    /// # Errors
    ///
    /// Returns the underlying I/O error if the entry cannot be written
    fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    dir: PathBuf,
}

impl DirectoryStorage {
    /// Creates the directory if absent
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the directory cannot be created
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "graph cache directory must not be empty".to_string(),
            ));
        }
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Configuration(format!(
                "cannot create graph cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl CacheStorage for DirectoryStorage {
    fn read(&self, key: &CacheKey) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
        // Readers never observe a partially written entry
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }
}

type KeyLock = Arc<Mutex<()>>;

/// Resolves areas to graphs, from storage or from the provider
///
/// At most one load runs per key: callers asking for the same key while a
/// fetch is in flight block until it finishes and then read the freshly
/// written entry. Graphs are not retained in memory here; holders keep the
/// returned `Arc`. The per-key lock table grows with every distinct key and
/// is never pruned.
pub struct GraphCache {
    storage: Box<dyn CacheStorage>,
    provider: Box<dyn GraphProvider>,
    key_locks: Mutex<HashMap<CacheKey, KeyLock>>,
}

impl GraphCache {
    pub fn new(storage: Box<dyn CacheStorage>, provider: Box<dyn GraphProvider>) -> Self {
        Self {
            storage,
            provider,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Directory storage from `config` and the given provider
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an invalid configuration
    pub fn from_config(
        config: &RouteConfig,
        provider: Box<dyn GraphProvider>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let storage = DirectoryStorage::new(&config.graph_cache_dir)?;
        Ok(Self::new(Box::new(storage), provider))
    }

    /// Loads the graph covering `radius_m` meters around `center`
    ///
    /// # Errors
    ///
    /// Returns `Error::GraphLoad` if no cached copy is usable and the
    /// provider fails
    pub fn load(&self, center: LatLon, radius_m: u32) -> Result<Arc<StreetGraph>, Error> {
        let area = SearchArea::new(center, radius_m);
        let key = CacheKey::from_area(&area);

        let lock = self.key_lock(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(graph) = self.read_cached(&key) {
            return Ok(Arc::new(graph));
        }

        let graph = self
            .provider
            .fetch_graph(&area)
            .map_err(|e| Error::GraphLoad {
                lat: center.lat,
                lon: center.lon,
                radius_m,
                reason: e.to_string(),
            })?;

        match encode_graph(&graph) {
            Ok(bytes) => match self.storage.write(&key, &bytes) {
                Ok(()) => info!("Graph saved to cache: {key}"),
                Err(e) => warn!("Failed to write graph cache for {key}: {e}"),
            },
            Err(e) => warn!("Failed to encode graph for {key}: {e}"),
        }

        Ok(Arc::new(graph))
    }

    fn key_lock(&self, key: CacheKey) -> KeyLock {
        let mut locks = self
            .key_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }

    fn read_cached(&self, key: &CacheKey) -> Option<StreetGraph> {
        let bytes = match self.storage.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to read cached graph {key}, re-downloading: {e}");
                return None;
            }
        };

        match decode_graph(&bytes) {
            Ok(graph) => {
                info!("Loading graph from cache: {key}");
                Some(graph)
            }
            Err(e) => {
                error!("Failed to load cached graph {key}, re-downloading: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedGraph {
    version: u32,
    nodes: Vec<CachedNode>,
    edges: Vec<CachedEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedNode {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedEdge {
    from: usize,
    to: usize,
    length: Meters,
    road_class: RoadClass,
}

fn encode_graph(graph: &StreetGraph) -> Result<Vec<u8>, Error> {
    let nodes = graph
        .node_indices()
        .filter_map(|idx| graph.node(idx))
        .map(|node| CachedNode {
            id: node.id,
            lat: node.geometry.y(),
            lon: node.geometry.x(),
        })
        .collect();

    let edges = graph
        .edge_indices()
        .filter_map(|idx| {
            let (from, to) = graph.edge_endpoints(idx)?;
            let edge = graph.edge(idx)?;
            Some(CachedEdge {
                from: from.index(),
                to: to.index(),
                length: edge.length,
                road_class: edge.road_class,
            })
        })
        .collect();

    let cached = CachedGraph {
        version: CACHE_VERSION,
        nodes,
        edges,
    };
    serde_json::to_vec(&cached).map_err(|e| Error::InvalidData(e.to_string()))
}

fn decode_graph(bytes: &[u8]) -> Result<StreetGraph, Error> {
    let cached: CachedGraph =
        serde_json::from_slice(bytes).map_err(|e| Error::InvalidData(e.to_string()))?;

    if cached.version != CACHE_VERSION {
        return Err(Error::InvalidData(format!(
            "cache version mismatch (got {}, need {CACHE_VERSION})",
            cached.version
        )));
    }

    let node_count = cached.nodes.len();
    let mut graph = DiGraph::with_capacity(node_count, cached.edges.len());
    let mut seen = HashSet::with_capacity(node_count);
    for node in cached.nodes {
        if !seen.insert(node.id) {
            return Err(Error::InvalidData(format!("duplicate node id {}", node.id)));
        }
        graph.add_node(StreetNode {
            id: node.id,
            geometry: Point::new(node.lon, node.lat),
        });
    }
    for edge in cached.edges {
        if edge.from >= node_count || edge.to >= node_count {
            return Err(Error::InvalidData(format!(
                "edge {}->{} references a missing node",
                edge.from, edge.to
            )));
        }
        if !(edge.length.is_finite() && edge.length >= 0.0) {
            return Err(Error::InvalidData(format!(
                "edge {}->{} has invalid length {}",
                edge.from, edge.to, edge.length
            )));
        }
        graph.add_edge(
            NodeIndex::new(edge.from),
            NodeIndex::new(edge.to),
            StreetEdge::new(edge.length, edge.road_class),
        );
    }

    Ok(StreetGraph::new(graph))
}
