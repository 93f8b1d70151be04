//! Codec tests

mod message_tests;
