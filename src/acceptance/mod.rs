//! Document acceptance requests.
//!
//! A member asks a portal contact to accept a generated document. The
//! contact reaches the request through an unguessable token, may view it any
//! number of times and accepts it once; a certificate of acceptance is then
//! rendered, stored and linked to the request. Requests that outlive their
//! deadline are expired lazily when touched and by a periodic sweep.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
