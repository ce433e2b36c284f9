//! Per-state configuration.

/// Knobs a [`GlobalState`](crate::GlobalState) carries. Copied verbatim by
/// `deep_copy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateOptions {
    /// Drop every diagnostic instead of pushing it to the sink.
    pub silence_errors: bool,
    /// Hide payload locations in dumps so snapshots stay stable.
    pub censor_for_snapshot_tests: bool,
    /// Reject user-entered names that look synthesized (contain `<`).
    pub ensure_clean_strings: bool,
    /// Names to reserve room for up front.
    pub name_capacity: usize,
    /// Class and module slots to reserve up front.
    pub class_capacity: usize,
    /// Method slots to reserve up front.
    pub method_capacity: usize,
}

impl Default for StateOptions {
    fn default() -> Self {
        StateOptions {
            silence_errors: false,
            censor_for_snapshot_tests: false,
            ensure_clean_strings: false,
            name_capacity: 1024,
            class_capacity: 256,
            method_capacity: 1024,
        }
    }
}

impl StateOptions {
    /// Options for snapshot tests: censored output, no preallocation.
    pub fn for_tests() -> Self {
        StateOptions {
            censor_for_snapshot_tests: true,
            name_capacity: 0,
            class_capacity: 0,
            method_capacity: 0,
            ..StateOptions::default()
        }
    }
}
