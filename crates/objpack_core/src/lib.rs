//! Object mapping codecs for a compact, self-describing MessagePack-style binary format.

/// Token reader/writer, codec registry, and per-type object codecs.
pub mod pack;
