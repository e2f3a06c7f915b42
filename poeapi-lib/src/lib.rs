//! `poeapi` is a rate-limited, caching client for the Path of Exile web API.
//!
//! Every request goes through a [`Client`], which
//! - answers repeated requests for the same URL from an in-memory LRU cache,
//! - keeps outgoing traffic under the API's rate limits, with a separate,
//!   stricter ceiling for the public stash tab endpoint,
//! - maps HTTP failures onto [`ErrorKind`] so callers can branch on them.
//!
//! Response bodies are returned as raw JSON strings.
//!
//! ```no_run
//! use poeapi_lib::{ClientBuilder, Endpoint, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let client = ClientBuilder::default().client()?;
//!   let leagues = client.get(&Endpoint::Leagues).await?;
//!   println!("{leagues}");
//!   Ok(())
//! }
//! ```
//!
//! Configuration can be adjusted through the builder:
//!
//! ```no_run
//! use std::time::Duration;
//! use poeapi_lib::{ClientBuilder, Endpoint, ErrorKind, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let client = ClientBuilder::builder()
//!       .use_cache(false)
//!       .rate_limit(2u32)
//!       .request_timeout(Duration::from_secs(5))
//!       .build()
//!       .client()?;
//!
//!   match client.get(&Endpoint::Stashes { change_id: None }).await {
//!       Ok(page) => println!("{} bytes", page.len()),
//!       Err(ErrorKind::RateLimited) => eprintln!("slow down"),
//!       Err(e) => return Err(e),
//!   }
//!   Ok(())
//! }
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    rustdoc::invalid_html_tags,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    variant_size_differences,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]
#![deny(missing_docs)]

mod api;
mod cache;
mod client;
mod endpoint;
mod types;

pub mod ratelimit;

pub use crate::{
    api::ApiClient,
    cache::{CacheStats, ResponseCache},
    client::{
        Client, ClientBuilder, DEFAULT_CACHE_SIZE, DEFAULT_RATE_LIMIT, DEFAULT_REQUEST_TIMEOUT,
        DEFAULT_STASH_RATE_LIMIT, MAX_RATE_LIMIT,
    },
    endpoint::{
        DEFAULT_HOST, DEFAULT_NINJA_HOST, Endpoint, HostKind, NINJA_STATS_PATH, STASH_PATH,
    },
    ratelimit::{RateClass, RateLimiter},
    types::{ErrorKind, Result, check_status},
};
