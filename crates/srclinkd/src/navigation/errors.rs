//! Error types for navigation.

use std::io;
use std::process::ExitStatus;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while resolving or opening a navigation target.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No source root contains a file for the requested type.
    #[error("no source file for {name} under {roots} source root(s)")]
    NotFound {
        /// Fully-qualified type name that was looked up.
        name: String,
        /// Number of source roots searched.
        roots: usize,
    },
    /// The editor command template contained no program.
    #[error("editor command is empty")]
    EmptyEditorCommand,
    /// The editor process could not be started.
    #[error("failed to launch editor '{program}' for {file}: {source}")]
    EditorSpawn {
        /// Program that failed to start.
        program: String,
        /// File that was being opened.
        file: Utf8PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The editor process exited unsuccessfully.
    #[error("editor '{program}' exited with {status} while opening {file}")]
    EditorExit {
        /// Program that was run.
        program: String,
        /// File that was being opened.
        file: Utf8PathBuf,
        /// Exit status reported by the process.
        status: ExitStatus,
    },
    /// The navigation worker thread could not be spawned.
    #[error("failed to spawn navigation worker: {source}")]
    Spawn {
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The navigation worker has stopped and no longer accepts targets.
    #[error("navigation queue is closed")]
    QueueClosed,
    /// The navigation worker panicked.
    #[error("navigation worker panicked")]
    WorkerPanic,
}
