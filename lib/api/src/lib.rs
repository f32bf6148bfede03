//! REST surface for bookrec.

pub mod rest;

pub use rest::{check_origin, configure, cors_policy, HttpConfig, RestApi};
