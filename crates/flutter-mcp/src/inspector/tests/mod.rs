//! Inspector tests
