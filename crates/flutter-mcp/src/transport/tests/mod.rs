//! Transport tests
