use std::sync::Arc;

use tracing::warn;

use crate::error::StoreError;

/// Observer for failures the availability-first surface swallows.
///
/// Attached with [`Warehouse::with_diagnostics`](crate::Warehouse::with_diagnostics)
/// and inherited by nested handles. Every failure that degrades to "no
/// data" is logged and then forwarded here. The hook cannot alter the
/// outcome — it exists so embedders and tests can observe what the cache
/// declined to surface.
pub type DiagnosticHook = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Log a swallowed failure and forward it to the hook, if any.
pub(crate) fn report(hook: Option<&DiagnosticHook>, error: &StoreError) {
    warn!(%error, "warehouse operation degraded");
    if let Some(hook) = hook {
        hook(error);
    }
}
