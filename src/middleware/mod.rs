// ABOUTME: HTTP middleware module root
// ABOUTME: Exposes CORS configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

/// CORS middleware configuration
pub mod cors;

pub use cors::setup_cors;
