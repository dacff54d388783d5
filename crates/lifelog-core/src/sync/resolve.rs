//! Last-write-wins conflict resolution

/// Decision for one incoming record against the stored copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Overwrite the stored copy with the incoming record
    Apply,
    /// Keep the stored copy; counts as one resolved conflict
    KeepServer,
}

/// Compare client and server `updated_at` instants (Unix ms).
///
/// The client wins only with a strictly greater timestamp; ties keep
/// the server copy, which is treated as authoritative. When either
/// side has no comparable instant the client wins unconditionally —
/// the same lenient policy the mobile clients have always relied on
/// for records that predate timestamp tracking.
pub const fn resolve(incoming: Option<i64>, existing: Option<i64>) -> Resolution {
    match (incoming, existing) {
        (Some(client), Some(server)) if client <= server => Resolution::KeepServer,
        _ => Resolution::Apply,
    }
}
