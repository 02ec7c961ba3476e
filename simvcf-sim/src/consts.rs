/// Redraws allowed per request before giving up on finding free positions.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 64;
