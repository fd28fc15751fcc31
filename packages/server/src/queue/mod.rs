//! Durable task queue backends.

pub mod qstash;

pub use qstash::QstashQueue;
