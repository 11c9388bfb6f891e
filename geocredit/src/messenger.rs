/// Notifies the presentation layer that displayed credits are out of date.
pub trait Messenger: Send + Sync {
    /// Requests the credits to be rendered again.
    fn request_redraw(&self);
}

impl<F> Messenger for F
where
    F: Fn() + Send + Sync,
{
    fn request_redraw(&self) {
        self()
    }
}

/// Messenger that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
