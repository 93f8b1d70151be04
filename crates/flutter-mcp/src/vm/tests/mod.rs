//! VM service client tests

mod client_tests;
