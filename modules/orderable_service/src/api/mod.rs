//! API layer - native client and REST adapter

pub mod native;
pub mod rest;
