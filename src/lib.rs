//! Local inference layer for a farm-management client.
//!
//! `farm-insight-core` classifies a field polygon into a named region,
//! serves region-relevant news through a persisted TTL cache, and scores how
//! similar two catalog products are. Geometry and scoring are pure and
//! deterministic; the feed layer never fails outward and returns an empty
//! list when the network or the feed is unusable.

pub mod cache;
pub mod catalog;
pub mod feed;
pub mod region;
pub mod similarity;
pub mod types;
