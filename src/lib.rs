//! Skill gap library

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod processing;
pub mod session;

pub use error::{Result, SkillGapError};
pub use config::Config;
