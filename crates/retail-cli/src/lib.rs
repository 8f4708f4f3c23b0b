//! Library side of the retail ETL command: configuration, logging and the
//! stage driver, shared by the binary and the integration tests.

pub mod config;
pub mod logging;
pub mod pipeline;
