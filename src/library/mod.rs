//! Managed library on disk.
//!
//! The library root holds a `.ytm/` content store addressed by channel and
//! track id, plus a browsable tree of relative symlinks into it.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/
//! ├── .ytm/
//! │   ├── config.yaml               # Optional library configuration
//! │   └── <channel_id>/
//! │       ├── .channel              # Channel id
//! │       └── <track_id>.ogg        # Canonical audio
//! ├── channels/<artist>/
//! │   ├── .channel                  # Channel id for `pull`
//! │   └── <album|unsorted>/<title>.ogg
//! └── playlists/<playlist>/
//!     ├── .playlist                 # Playlist URL for `pull`
//!     └── <title>.ogg
//! ```

pub mod links;
pub mod markers;
pub mod materializer;
pub mod root;

pub use markers::read_pull_marker;
pub use materializer::Materializer;
pub use root::{find_library_root, init_library};
