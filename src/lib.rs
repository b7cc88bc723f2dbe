//! CPF Consult Proxy Library
//!
//! A single HTTP endpoint that validates a Brazilian CPF, forwards it to the
//! third-party consult API with a bearer token and relays the answer back,
//! with normalized error bodies and a bounded deadline.
//!
//! # Modules
//!
//! - `app`: Router assembly and response-header layers.
//! - `config`: Configuration management.
//! - `consult_client`: Consult API client.
//! - `cpf`: CPF normalization and validation.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.

pub mod app;
pub mod config;
pub mod consult_client;
pub mod cpf;
pub mod errors;
pub mod handlers;
