//! RAII handle for a rendered payment widget.

use crate::script::WidgetInstance;

/// Owned handle for a rendered widget.
///
/// The widget is released when the handle drops, on every exit path.
/// Teardown is best-effort: SDK failures are logged and swallowed, never
/// propagated.
pub struct WidgetHandle {
    instance: Option<Box<dyn WidgetInstance>>,
}

impl WidgetHandle {
    /// Wrap a rendered widget instance.
    #[must_use]
    pub fn new(instance: Box<dyn WidgetInstance>) -> Self {
        Self {
            instance: Some(instance),
        }
    }

    /// Release the widget now instead of waiting for drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut instance) = self.instance.take()
            && let Err(e) = instance.close()
        {
            tracing::debug!("widget teardown failed: {e}");
        }
    }
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("open", &self.instance.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::CheckoutError;

    struct TrackedWidget {
        closes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl WidgetInstance for TrackedWidget {
        fn close(&mut self) -> Result<(), CheckoutError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CheckoutError::Widget("sdk teardown rejected".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_drop_releases_widget_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        {
            let _handle = WidgetHandle::new(Box::new(TrackedWidget {
                closes: Arc::clone(&closes),
                fail: false,
            }));
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_close_skips_double_release() {
        let closes = Arc::new(AtomicUsize::new(0));
        let handle = WidgetHandle::new(Box::new(TrackedWidget {
            closes: Arc::clone(&closes),
            fail: false,
        }));
        handle.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_teardown_failure_is_swallowed() {
        let closes = Arc::new(AtomicUsize::new(0));
        let handle = WidgetHandle::new(Box::new(TrackedWidget {
            closes: Arc::clone(&closes),
            fail: true,
        }));
        // Must not panic or propagate
        drop(handle);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
