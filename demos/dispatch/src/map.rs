//! Built-in demo map, used when no `--map-file` is given.
//!
//! A 9 × 3 street grid spanning (0,0)–(8,2) plus a spur up to a hillside
//! node at (4,8).  Avenues (east–west) are fast; cross streets are slower.

use std::io::Cursor;

use rd_spatial::{RoadNetwork, SpatialResult, load_map_reader};

const DEMO_MAP_CSV: &str = "\
# node_a, ax, ay, node_b, bx, by, weight
# ── south avenue ──
s0,0,0,s1,1,0,1.0
s1,1,0,s2,2,0,1.0
s2,2,0,s3,3,0,1.0
s3,3,0,s4,4,0,1.0
s4,4,0,s5,5,0,1.0
s5,5,0,s6,6,0,1.0
s6,6,0,s7,7,0,1.0
s7,7,0,s8,8,0,1.0
# ── middle avenue ──
m0,0,1,m2,2,1,2.5
m2,2,1,m4,4,1,2.5
m4,4,1,m6,6,1,2.5
m6,6,1,m8,8,1,2.5
# ── north avenue ──
n0,0,2,n4,4,2,4.0
n4,4,2,n8,8,2,4.0
# ── cross streets ──
s0,0,0,m0,0,1,1.5
m0,0,1,n0,0,2,1.5
s2,2,0,m2,2,1,1.5
s4,4,0,m4,4,1,1.5
m4,4,1,n4,4,2,1.5
s6,6,0,m6,6,1,1.5
s8,8,0,m8,8,1,1.5
m8,8,1,n8,8,2,1.5
# ── hillside spur ──
n4,4,2,h1,4,5,4.5
h1,4,5,h2,4,8,4.5
";

pub fn demo_network() -> SpatialResult<RoadNetwork> {
    load_map_reader(Cursor::new(DEMO_MAP_CSV))
}
