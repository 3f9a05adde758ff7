// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reasons an editor command had no effect.

use keystage_timeline::TimelineError;
use thiserror::Error;

/// Rejected editor command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The timeline refused the mutation
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// Direct manipulation is locked during playback
    #[error("Direct manipulation is disabled while playing")]
    Playing,

    /// The command needs a selection
    #[error("Nothing is selected")]
    NothingSelected,

    /// The clipboard holds nothing usable for this paste
    #[error("Clipboard has nothing to paste")]
    NothingToPaste,
}

/// Result type for editor commands
pub type Result<T> = std::result::Result<T, EditError>;
