mod cache;
mod client;
mod config;
mod entity;
mod error;
mod logger;
mod protocol;
mod types;

pub use cache::{DataCache, SharedCache};
pub use client::{NeviwebClient, NeviwebClientBuilder};
pub use config::{DEFAULT_NAME, PlatformConfig, build_entities, setup_platform};
pub use entity::{ClimateEntity, SUPPORT_TARGET_TEMPERATURE, Thermostat};
pub use error::{Error, Result};
pub use types::*;
