//! Client-side rate limiting.
//!
//! The API enforces two ceilings: a generous one shared by most endpoints and
//! a strict one for the public stash tab endpoint. Staying under both keeps
//! `429 Too Many Requests` responses rare; nothing here retries them.
//!
//! - [`RateClass`]: which ceiling a request counts against
//! - [`RateLimiter`]: waits until a request of a given class may be sent

mod class;
mod limiter;

pub use class::RateClass;
pub use limiter::RateLimiter;
