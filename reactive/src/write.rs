use crate::id::Id;

pub trait SignalUpdate<T> {
    /// get the Signal Id
    fn id(&self) -> Id;

    /// Sets the new_value to the Signal and triggers effect run
    fn set(&self, new_value: T)
    where
        T: 'static,
    {
        if let Some(signal) = self.id().signal() {
            signal.update_value(|v| *v = new_value);
        }
    }

    /// Sets the new_value only if it differs from the stored one.
    /// Returns whether a write (and an effect run) happened.
    fn set_if_changed(&self, new_value: T) -> bool
    where
        T: PartialEq + 'static,
    {
        let Some(signal) = self.id().signal() else {
            return false;
        };
        if signal.with_untracked(|v: &T| *v == new_value) {
            return false;
        }
        signal.update_value(|v| *v = new_value);
        true
    }

    /// Update the stored value with the given function and triggers effect run
    fn update(&self, f: impl FnOnce(&mut T))
    where
        T: 'static,
    {
        if let Some(signal) = self.id().signal() {
            signal.update_value(f);
        }
    }

    /// Update the stored value with the given function, triggers effect run,
    /// and returns the value returned by the function
    fn try_update<O>(&self, f: impl FnOnce(&mut T) -> O) -> Option<O>
    where
        T: 'static,
    {
        self.id().signal().map(|signal| signal.update_value(f))
    }
}
