use rd_core::{CoreError, VehicleId};
use rd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("road network has no nodes; riders cannot be placed")]
    EmptyNetwork,

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("vehicle {vehicle} is {state} but index membership is {indexed}")]
    IndexDesync {
        vehicle: VehicleId,
        state:   &'static str,
        indexed: bool,
    },

    #[error("spatial index holds {indexed} entries for {available} available vehicles")]
    IndexSize { indexed: usize, available: usize },
}

pub type SimResult<T> = Result<T, SimError>;
