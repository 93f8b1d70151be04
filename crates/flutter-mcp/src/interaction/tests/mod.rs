//! Interaction tests

mod driver_tests;
