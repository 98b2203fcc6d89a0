/// Display name used when a connection doesn't provide one.
pub const DEFAULT_PLAYER_NAME: &str = "Guest";

/// Display names are truncated to this many characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Default cap on players seated in one room.
pub const DEFAULT_MAX_PLAYERS: usize = 12;

/// Length of generated room identifiers.
pub const ROOM_ID_LENGTH: usize = 6;

/// Alphabet used for generated room identifiers (lowercase base-36).
pub const ROOM_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Prefix prepended to connection-derived player identifiers.
pub const PLAYER_ID_PREFIX: &str = "p_";
