//! Map loader for weighted-edge records.
//!
//! # Format
//!
//! One undirected road per line, seven comma-separated fields:
//!
//! ```text
//! # node_a_id,node_a_x,node_a_y,node_b_id,node_b_x,node_b_y,weight
//! A,0,0,B,2,0,2.5
//! B,2,0,C,2,3,3
//! ```
//!
//! - Lines starting with `#` and blank lines are ignored.
//! - Records with any other field count are skipped.
//! - Node ids are free-form labels; the first coordinate seen for a label
//!   wins.
//! - A record with the right arity but an unparsable number, or a negative
//!   or non-finite weight, fails the whole load.

use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use rd_core::Point;

use crate::{RoadNetwork, RoadNetworkBuilder, SpatialError, SpatialResult};

const RECORD_ARITY: usize = 7;

/// Load a road network from a map file.
pub fn load_map_file(path: &Path) -> SpatialResult<RoadNetwork> {
    let file = std::fs::File::open(path).map_err(|source| SpatialError::MapSource {
        path: path.to_path_buf(),
        source,
    })?;
    load_map_reader(file)
}

/// Like [`load_map_file`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded maps.
pub fn load_map_reader<R: Read>(reader: R) -> SpatialResult<RoadNetwork> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut builder = RoadNetworkBuilder::new();
    let mut skipped = 0usize;

    for result in csv_reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            SpatialError::MapLoad { line, reason: e.to_string() }
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != RECORD_ARITY {
            trace!(line, fields = record.len(), "skipping map record with wrong arity");
            skipped += 1;
            continue;
        }

        let number = |i: usize| -> SpatialResult<f64> {
            let field = &record[i];
            field.parse::<f64>().map_err(|_| SpatialError::MapLoad {
                line,
                reason: format!("field {} is not a number: {field:?}", i + 1),
            })
        };

        let a_point = Point::new(number(1)?, number(2)?);
        let b_point = Point::new(number(4)?, number(5)?);
        let weight = number(6)?;
        if !(a_point.is_finite() && b_point.is_finite()) {
            return Err(SpatialError::MapLoad {
                line,
                reason: "node coordinates must be finite".into(),
            });
        }

        let a = builder.add_node(&record[0], a_point);
        let b = builder.add_node(&record[3], b_point);
        builder.add_road(a, b, weight).map_err(|e| SpatialError::MapLoad {
            line,
            reason: e.to_string(),
        })?;
    }

    debug!(
        nodes = builder.node_count(),
        roads = builder.road_count(),
        skipped,
        "map loaded"
    );
    Ok(builder.build())
}
