use log::warn;
use serde::Serialize;
use std::fmt;

use crate::station::Station;
use crate::store::RecordStore;
use crate::tour::Tour;

/// Outcome of asking whether a station may be removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionCheck {
    pub deletable: bool,

    #[serde(rename = "blockingTours", skip_serializing_if = "Vec::is_empty")]
    pub blocking_tours: Vec<Tour>,
}

/// Scans the live tour set for references to the station.
///
/// Every blocking tour is returned, not just the first, so the caller
/// can show the user exactly which tours would lose a stop.
pub fn check_deletable(station_id: &str, tours: &[Tour]) -> DeletionCheck {
    let blocking_tours: Vec<Tour> = tours
        .iter()
        .filter(|tour| tour.references_station(station_id))
        .cloned()
        .collect();

    DeletionCheck {
        deletable: blocking_tours.is_empty(),
        blocking_tours,
    }
}

/// A refused deletion, carrying the tours that still reference the
/// station. Nothing is cascaded; resolving the conflict is up to the
/// caller.
#[derive(Debug, Clone)]
pub struct IntegrityConflict {
    pub station_id: String,
    pub blocking_tours: Vec<Tour>,
}

impl fmt::Display for IntegrityConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "station {} is still referenced by {} tour(s)",
            self.station_id,
            self.blocking_tours.len()
        )
    }
}

/// Fail-closed removal of a station.
///
/// The tour scan runs first and must come back clean before the delete
/// is issued; a station that no tour references is removed from the
/// station store. Returns whether a record was actually deleted.
pub fn delete_station<S, T>(
    stations: &mut S,
    tours: &T,
    station_id: &str,
) -> Result<bool, IntegrityConflict>
where
    S: RecordStore<Station>,
    T: RecordStore<Tour>,
{
    let check = check_deletable(station_id, &tours.find_all());
    if !check.deletable {
        warn!(
            "refusing to delete station {}: referenced by {} tour(s)",
            station_id,
            check.blocking_tours.len()
        );
        return Err(IntegrityConflict {
            station_id: station_id.to_string(),
            blocking_tours: check.blocking_tours,
        });
    }

    Ok(stations.delete_by_id(station_id))
}
