use core::any::Any;

/// Lifecycle callbacks a dependency may opt into.
///
/// Register the dependency with [`crate::Descriptor::managed`] to have the container call them.
pub trait Lifecycle {
    /// Called once, right after the factory returns and before the value is cached or handed out
    fn post_construct(&mut self) {}

    /// Reserved for teardown. The container never calls it.
    fn pre_destroy(&mut self) {}
}

pub(crate) type PostConstructFn = fn(&mut (dyn Any + Send + Sync));

pub(crate) fn post_construct<T: Lifecycle + 'static>(value: &mut (dyn Any + Send + Sync)) {
    if let Some(value) = value.downcast_mut::<T>() {
        value.post_construct();
    }
}
