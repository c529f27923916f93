//! Application layer orchestrating the admission pipeline.
//!
//! This module defines the `AdmissionCoordinator`, the single entry point
//! for inbound registration requests, and the bounded `RetryPolicy` it wraps
//! around durable writes.

pub mod coordinator;
pub mod retry;
