#![warn(missing_docs)]

//! <div class="warning">
//!
//! Note: API is unstable, and may change in `0.x` versions.
//!
//! </div>
//!
//! A thin client for the [safebooru](https://safebooru.org) API.
//!
//! # As a library
//!
//! Usually, you prefer to use [`Safebooru`] with the queries of [`api`]:
//! [`api::Posts`], [`api::Tags`] and [`api::Comments`].
//!
//! See [`safebooru::Safebooru#example`] for example.
//!
//! Every operation is a single request, nothing is cached or retried,
//! and the errors of the HTTP/JSON/XML layers are returned as they are, see [`Error`].
//!
//! # As a binary
//!
//! Enable the `cli` feature, then see `main.rs` to know how to assemble these modules as a binary.

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod safebooru;

pub mod config;
pub mod download;
pub mod error;
pub mod tool;

pub use error::{Error, Result};
pub use safebooru::Safebooru;
