//! Server tests
