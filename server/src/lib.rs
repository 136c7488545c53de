//! StudyGuard Server - study service for the Pomodoro client.
//!
//! This crate provides the service the StudyGuard client talks to:
//! - An in-memory task board
//! - The monitoring flag toggled at session start and stop
//! - Attention tracking fed by the capture process, which drives
//!   motivational quotes and break suggestions
//!
//! All state lives in memory and is lost on restart.

pub mod attention;
pub mod board;
pub mod config;
pub mod error;
pub mod quotes;
pub mod routes;
pub mod types;
