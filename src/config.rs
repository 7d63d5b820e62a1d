//! # Parser Configuration
//!
//! A [`ParserConfig`] is handed to [`Parser::with_config`](crate::Parser::with_config)
//! and stays fixed for the life of the parser.

use log::LevelFilter;

/// Defines how the parser should handle sentence checksums.
///
/// NMEA 0183 sentences normally end in `*HH`, where `HH` is the XOR of every
/// byte between `$` and `*`. A mismatch is always a soft condition: it is
/// logged and recorded in [`Record::checksum_valid`](crate::Record::checksum_valid),
/// but the record is still emitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    /// A `*HH` checksum must be present.
    ///
    /// A sentence terminated by `<CR>` or `<LF>` right after its last field is
    /// a structural error.
    Required,

    /// A `*HH` checksum is accepted but not required.
    ///
    /// Sentences without one are finalized with `checksum_valid == None`.
    #[default]
    Optional,
}

/// Defines what happens after a byte that does not fit the grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryMode {
    /// Stop at the first structural error.
    ///
    /// The current call returns [`Error::UnexpectedByte`](crate::Error::UnexpectedByte),
    /// the remaining bytes of that call are not processed and every later call
    /// fails with [`Error::Halted`](crate::Error::Halted) until
    /// [`reset`](crate::Parser::reset) is called.
    #[default]
    Abort,

    /// Drop the sentence in progress and scan for the next `$`.
    ///
    /// The error is logged, counted in [`Parser::discarded`](crate::Parser::discarded)
    /// and parsing continues with the next byte of the same call. If the
    /// offending byte is itself a `$`, a new sentence starts there.
    Resync,
}

/// Runtime configuration of a [`Parser`](crate::Parser).
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Messages above this level are not forwarded to the `log` facade.
    pub log_level: LevelFilter,
    /// Whether a `*HH` checksum is mandatory.
    pub checksum: ChecksumMode,
    /// Reaction to structural errors.
    pub recovery: RecoveryMode,
    /// Added to the two-digit year of RMC dates before timestamps are built.
    pub century: i32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            checksum: ChecksumMode::default(),
            recovery: RecoveryMode::default(),
            century: 2000,
        }
    }
}

impl ParserConfig {
    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_checksum(mut self, checksum: ChecksumMode) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_recovery(mut self, recovery: RecoveryMode) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_century(mut self, century: i32) -> Self {
        self.century = century;
        self
    }
}
