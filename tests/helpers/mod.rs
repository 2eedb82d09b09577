// Shared helpers for contract and integration tests.
//
// Contract tests run the real route table against a lazily-connected pool, so
// anything rejected before persistence can be checked without MySQL.
// Integration tests need TEST_DATABASE_URL pointing at a disposable database.

#![allow(dead_code)]

pub mod test_data;
pub mod test_database;

pub use test_data::*;
pub use test_database::*;
