/// Logs through the [`log`] facade, but only when `$level` passes `$filter`.
///
/// Every [`Parser`](crate::Parser) carries its own [`log::LevelFilter`], so two
/// parsers in one process can run with different verbosity.
macro_rules! log_at {
    ($filter:expr, $level:ident, $($arg:tt)+) => {
        if log::Level::$level <= $filter {
            log::log!(log::Level::$level, $($arg)+);
        }
    };
}

/// Declares an enum whose variants are selected by a single ASCII byte.
///
/// The generated `LETTERS` table doubles as the set of bytes a one-letter field
/// decoder accepts for this enum.
macro_rules! letter_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $letter:literal => $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Bytes that select a variant.
            pub const LETTERS: &'static [u8] = &[$($letter),*];

            /// Variant selected by `letter`, if any.
            pub fn from_letter(letter: u8) -> Option<Self> {
                match letter {
                    $($letter => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Byte that selects this variant.
            pub fn letter(self) -> u8 {
                match self {
                    $(Self::$variant => $letter,)*
                }
            }
        }
    };
}
