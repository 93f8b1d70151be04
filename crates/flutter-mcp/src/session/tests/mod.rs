//! Session tests

mod state_tests;
