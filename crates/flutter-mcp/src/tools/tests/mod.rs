//! Tool tests

mod flutter_find_tests;
mod flutter_scroll_tests;
mod flutter_tap_tests;
mod registry_tests;
