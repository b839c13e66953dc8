//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the FTP session, local
//! filesystem access, configuration persistence, and terminal prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod fs;
pub mod ftp;
pub mod manifest;
pub mod prompt;
