//! HTTP primitives shared by the API transport

pub mod client;

pub use client::{app_identity, HttpClient, HttpClientBuilder};
