//! Hash routing: parsing, the route table, the auth gate and navigation.
//!
//! # Module Structure
//!
//! - `location`: hash parsing into path + query
//! - `table`: static route table
//! - `gate`: auth gate decisions
//! - `navigation`: location writes and change notifications

mod gate;
mod location;
mod navigation;
mod table;

pub use gate::{AuthGate, GateDecision};
pub use location::{ParsedLocation, QueryMap, parse_location, to_hash};
pub use navigation::{
    DEFAULT_NAVIGATION_TICK, LocationChanged, LocationHost, MemoryLocation, NavigationDispatcher,
};
pub use table::{
    DASHBOARD_PATH, LOGIN_PATH, PageKind, ROOT_PATH, Route, RouteTable, UNAUTHENTICATED_ONLY_PATHS,
};
