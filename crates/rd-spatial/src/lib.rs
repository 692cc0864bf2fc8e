//! `rd-spatial` — road network, shortest paths, and vehicle spatial index.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR + R-tree node snapping), `RoadNetworkBuilder` |
//! | [`loader`]   | `load_map_file`, `load_map_reader` (weighted-edge records) |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`, `route_between` |
//! | [`quadtree`] | `QuadTree<T>` arena quadtree, `Neighbor<T>`                |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! The road network and the quadtree are independent: the
//! network answers "which road node is closest to this coordinate", the
//! quadtree answers "which available vehicles are closest to this
//! coordinate" and is rebuilt incrementally as vehicles are matched.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public data types.      |

pub mod error;
pub mod loader;
pub mod network;
pub mod quadtree;
pub mod router;

mod ord;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_map_file, load_map_reader};
pub use network::{FALLBACK_BOUNDS, Road, RoadNetwork, RoadNetworkBuilder};
pub use quadtree::{Neighbor, QuadTree};
pub use router::{DijkstraRouter, Route, Router, route_between};
