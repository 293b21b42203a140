//! Re-entrancy guard and batch-update scope shared by expandos and panes

/// Phase of a layout-capable widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LayoutPhase {
    #[default]
    Idle,
    InLayout,
}

/// Guards a layout pass against re-entry.
///
/// Nested attempts while a pass is running are refused; the caller drops
/// them silently.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutGuard {
    phase: LayoutPhase,
}

impl LayoutGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass; `false` if one is already running
    pub fn try_enter(&mut self) -> bool {
        match self.phase {
            LayoutPhase::Idle => {
                self.phase = LayoutPhase::InLayout;
                true
            }
            LayoutPhase::InLayout => false,
        }
    }

    /// Finish the running pass
    pub fn exit(&mut self) {
        debug_assert_eq!(
            self.phase,
            LayoutPhase::InLayout,
            "layout pass exited without being entered"
        );
        self.phase = LayoutPhase::Idle;
    }

    pub fn is_active(&self) -> bool {
        self.phase == LayoutPhase::InLayout
    }
}

/// Depth counter for `begin_update`/`end_update` with a deferred-work flag
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateScope {
    depth: u32,
    pending: bool,
}

impl UpdateScope {
    pub fn begin(&mut self) {
        self.depth += 1;
    }

    /// Leave one level. Returns `true` when the outermost level closed and
    /// deferred work was recorded; the pending flag is cleared.
    pub fn end(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        if self.depth == 0 {
            std::mem::take(&mut self.pending)
        } else {
            false
        }
    }

    pub fn is_updating(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Record work to run when the scope closes
    pub fn defer(&mut self) {
        self.pending = true;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_refuses_nested_entry() {
        let mut guard = LayoutGuard::new();
        assert!(guard.try_enter());
        assert!(!guard.try_enter());
        assert!(guard.is_active());
        guard.exit();
        assert!(!guard.is_active());
        assert!(guard.try_enter());
    }

    #[test]
    fn test_scope_reports_pending_only_at_depth_zero() {
        let mut scope = UpdateScope::default();
        scope.begin();
        scope.begin();
        scope.defer();
        assert!(!scope.end());
        assert!(scope.is_updating());
        assert!(scope.end());
        assert!(!scope.has_pending());
        assert!(!scope.end());
    }

    #[test]
    fn test_scope_without_work_reports_nothing() {
        let mut scope = UpdateScope::default();
        scope.begin();
        assert!(!scope.end());
    }
}
