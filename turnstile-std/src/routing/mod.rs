//! Route descriptor normalization and the flattened route table.

mod entry;
mod normalize;

pub use entry::RouteEntry;
pub use normalize::{
    expand_aliases, join_routes, normalize_slashes, parse_route, resolve_routes,
    WILDCARD_METHODS,
};
