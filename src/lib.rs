//! # Guesthouse Bot
//!
//! A Telegram bot that lets the staff of a small guesthouse register room
//! bookings, browse and cancel them, record payments and get a morning
//! digest of arrivals and departures.
//!
//! ## Features
//! - Step-by-step booking wizard with returning-guest lookup
//! - Double-booking protection on half-open `[check-in, check-out)` stays
//! - Booking cards with cancel, delete and payment actions
//! - Daily completion sweep and admin digest
//! - Persistent storage with SQLite

/// Bot commands, dialogue state and update handlers
pub mod bot;
/// Configuration loaded from environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error type for booking operations
pub mod error;
/// Availability rule, booking service, daily jobs and health endpoints
pub mod services;
/// Utility functions for dates, validation, and formatting
pub mod utils;
