//! Subcommand implementations.

/// Configure command handler.
pub mod configure;

/// Practice (conversation) command handler.
pub mod practice;

/// Local voice listing.
pub mod voices;
