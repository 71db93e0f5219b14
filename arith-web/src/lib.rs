//! HTTP front-end for `arith-core`.
//!
//! Exposes a single JSON endpoint, `POST /api/v1/calculate`, that takes
//! `{"expression": "..."}` and answers with either `{"result": n}` or
//! `{"error": "..."}`.

pub mod api;
pub mod http;
pub mod server;

pub use server::{ServerConfig, serve};
