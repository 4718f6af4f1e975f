//! Places-search relay: hides the API key and clamps parameters before forwarding.

#[cfg(test)]
pub(crate) mod mock;
mod params;
mod relay;

pub use params::{NearbyParams, TextParams, from_query_pairs, parse_coordinate, resolve_radius, resolve_type};
pub use relay::{NEARBY_ENDPOINT, PlacesRelay, RelayError, RelayResponse, TEXT_ENDPOINT};
