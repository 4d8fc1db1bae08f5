//! Wire and domain types for charging-station lookups.

use serde::Deserialize;

use evtrip_core::GeoPoint;

/// A charging station returned by a lookup. These are cached per search
/// point; the planner computes its own distance to the target when
/// selecting one.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub point: GeoPoint,
    pub title: String,
}

/// One POI record from the provider. Only the address block is consumed.
#[derive(Debug, Deserialize)]
pub struct Poi {
    #[serde(rename = "AddressInfo")]
    pub address_info: Option<AddressInfo>,
}

#[derive(Debug, Deserialize)]
pub struct AddressInfo {
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
}

impl Poi {
    /// Converts the record into a [`Station`], skipping records without
    /// coordinates. Missing titles fall back to a placeholder.
    pub(crate) fn into_station(self) -> Option<Station> {
        let info = self.address_info?;
        let (lat, lon) = (info.latitude?, info.longitude?);
        Some(Station {
            point: GeoPoint::new(lon, lat),
            title: info.title.unwrap_or_else(|| "Unnamed station".to_owned()),
        })
    }
}
