#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc)]

pub mod action;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod task;
