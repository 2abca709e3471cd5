//! Shared primitive types used across the generator.

/// An opaque 8-character contact identifier.
pub type ContactId = String;

/// The configured name of an acquisition/retention channel.
pub type ChannelName = String;

/// A calendar year.
pub type Year = i32;
