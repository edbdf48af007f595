/// Marker for immutable state snapshots
///
/// A state value has no identity beyond equality: the store only notifies
/// subscribers when a reduction produces a value that differs from the
/// current one.
pub trait State: Clone + PartialEq + Send + Sync + 'static {}

impl<T> State for T where T: Clone + PartialEq + Send + Sync + 'static {}
