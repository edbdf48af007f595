use std::fmt::Debug;

/// Marker for values that describe "something happened"
///
/// Each domain defines one closed `enum` of actions per store. Actions are moved
/// into the pipeline on dispatch and never mutated afterwards; middleware that
/// fans an action out or records it clones it.
pub trait Action: Debug + Clone + Send + Sync + 'static {}

impl<T> Action for T where T: Debug + Clone + Send + Sync + 'static {}
