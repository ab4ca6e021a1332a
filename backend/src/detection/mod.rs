pub mod audio;
pub mod error;
pub mod hive;
pub mod image;
pub mod ingress;
pub mod models;
pub mod provider;
pub mod service;
pub mod sightengine;
pub mod video;

#[cfg(test)]
pub mod mock;
