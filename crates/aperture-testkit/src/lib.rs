//! Test support for the aperture backend: per-test database and client
//! fixtures, canned identities, login/seeding helpers, and in-memory
//! fake stores for message and search tests.
//!
//! Nothing here is global. Every fixture owns its state (temp database
//! file, counters, maps) and hands it to exactly one test.

pub mod fake_messages;
pub mod fake_search;
pub mod harness;
pub mod identities;
pub mod seed;
