//! Before/after hooks composed around every resolver invocation.

use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolveInfo;

/// Observes field resolution.
///
/// Hooks form a fixed-order stack: `on_field_start` runs in registration
/// order before the resolver is invoked, `on_field_end` runs in reverse
/// order after it settles, like unwinding nested scopes. `on_field_end`
/// always runs, whether the resolver succeeded or raised.
pub trait FieldHook: Send + Sync {
    fn on_field_start(&self, _info: &ResolveInfo) {}

    fn on_field_end(&self, _info: &ResolveInfo, _outcome: Result<(), &FieldError>) {}
}
