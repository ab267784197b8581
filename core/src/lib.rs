pub mod assignment;
pub mod collection;
pub mod config;
pub mod error;
pub mod fragmenter;
pub mod master;
pub mod message;
pub mod transform;
pub mod transport;
pub mod types;
pub mod worker;
