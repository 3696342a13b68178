//! Engine-side state for one registered field.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::adapter::{FieldAdapter, Subscription};
use crate::rules::RuleSet;

pub(super) struct FieldBinding {
    pub(super) adapter: Arc<dyn FieldAdapter>,
    pub(super) rules: Arc<RuleSet>,
    pub(super) touched: bool,
    change_subscription: Option<Subscription>,
    focus_subscription: Option<Subscription>,
    /// Shared with the installed listener; cleared when the binding is severed.
    live: Arc<AtomicBool>,
}

impl FieldBinding {
    pub(super) fn new(
        adapter: Arc<dyn FieldAdapter>,
        rules: RuleSet,
        change_subscription: Option<Subscription>,
        focus_subscription: Option<Subscription>,
        live: Arc<AtomicBool>,
    ) -> Self {
        Self {
            adapter,
            rules: Arc::new(rules),
            touched: false,
            change_subscription,
            focus_subscription,
            live,
        }
    }

    /// Disarm the listener and release both subscriptions.
    pub(super) fn sever(&self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(sub) = &self.change_subscription {
            sub.unsubscribe();
        }
        if let Some(sub) = &self.focus_subscription {
            sub.unsubscribe();
        }
    }
}
