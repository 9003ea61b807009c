//! Track resolution and playlist assembly.
//!
//! The per-track work runs strictly one track at a time: it keeps the search
//! and insert calls under the YouTube per-second quota and makes ordinal order
//! trivial to preserve.

mod assembler;
mod resolver;

pub use assembler::Conversion;
pub use assembler::PLAYLIST_DESCRIPTION;
pub use assembler::PlaylistAssembler;
pub use assembler::Progress;
pub use resolver::TrackResolver;
