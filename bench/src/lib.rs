//! Benchmark utilities for Rusty Pool.
//!
//! - **Microbenchmarks**: individual pool operations (create, add, replace, group build, destroy)
//! - **Scenario benchmarks**: system-driven workloads (particles, group churn)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_pool_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_pool_bench -- create
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod scenarios;
