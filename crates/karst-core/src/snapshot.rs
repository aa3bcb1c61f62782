//! Inspection snapshots exported by pool diagnostics.

/// Point-in-time description of one segment, as reported by
/// pool inspection.
///
/// Snapshots are listed in address order, so offsets are recoverable as
/// prefix sums of the sizes. A snapshot is a copy — it does not pin the
/// pool and goes stale as soon as the pool mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSnapshot {
    /// Size of the segment in bytes.
    pub size: usize,
    /// Whether the segment is allocated (`true`) or a gap (`false`).
    pub allocated: bool,
}
