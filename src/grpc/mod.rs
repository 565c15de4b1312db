pub mod client;
pub mod proto;
pub mod service;

pub use client::{ConnectionConfig, GrpcClient, GrpcClientBuilder};
