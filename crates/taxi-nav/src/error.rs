use thiserror::Error;

/// Reasons a taxi cannot be given a trip.  All of them leave the taxi idle;
/// none stops the simulation.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no {role} waypoint configured")]
    MissingWaypoint { role: &'static str },

    #[error("{role} waypoint {name:?} does not exist")]
    UnknownWaypoint { role: &'static str, name: String },

    #[error("some leg of the trip is unreachable")]
    Unreachable,
}

pub type NavResult<T> = Result<T, NavError>;
