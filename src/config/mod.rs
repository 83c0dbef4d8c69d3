// ABOUTME: Configuration module root for the coupon service
// ABOUTME: Re-exports environment-based server configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

/// Environment-based server configuration
pub mod environment;
