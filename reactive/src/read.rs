use crate::id::Id;

pub trait SignalGet<T: Clone> {
    /// get the Signal Id
    fn id(&self) -> Id;

    /// Clones and returns the current value stored in the Signal, but it doesn't subscribe
    /// to the current running effect.
    fn get_untracked(&self) -> T
    where
        T: 'static,
    {
        self.try_get_untracked().expect("signal is disposed")
    }

    /// Clones and returns the current value stored in the Signal, and subscribes
    /// to the current running effect to this Signal.
    fn get(&self) -> T
    where
        T: 'static,
    {
        self.try_get().expect("signal is disposed")
    }

    /// Try to clone and return the current value stored in the Signal, and returns None
    /// if it's already disposed. It subscribes to the current running effect.
    fn try_get(&self) -> Option<T>
    where
        T: 'static,
    {
        self.id().signal().map(|signal| signal.get())
    }

    /// Try to clone and return the current value stored in the Signal, and returns None
    /// if it's already disposed. It doesn't subscribe to the current running effect.
    fn try_get_untracked(&self) -> Option<T>
    where
        T: 'static,
    {
        self.id().signal().map(|signal| signal.get_untracked())
    }
}

pub trait SignalWith<T> {
    /// get the Signal Id
    fn id(&self) -> Id;

    /// If the signal isn't disposed,
    /// subscribes to the current running effect to this Signal.
    fn track(&self) {
        if let Some(signal) = self.id().signal() {
            signal.subscribe();
        }
    }

    /// Number of writes this Signal has seen, zero once disposed.
    fn version(&self) -> u64 {
        self.id()
            .signal()
            .map(|signal| signal.version.get())
            .unwrap_or_default()
    }

    /// Applies a closure to the current value stored in the Signal, and subscribes
    /// to the current running effect to this Signal.
    fn with<O>(&self, f: impl FnOnce(&T) -> O) -> O
    where
        T: 'static,
    {
        self.id().signal().expect("signal is disposed").with(f)
    }

    /// Applies a closure to the current value stored in the Signal, but it doesn't subscribe
    /// to the current running effect.
    fn with_untracked<O>(&self, f: impl FnOnce(&T) -> O) -> O
    where
        T: 'static,
    {
        self.id()
            .signal()
            .expect("signal is disposed")
            .with_untracked(f)
    }

    /// If the signal isn't disposed, applies a closure to the current value stored in the Signal.
    /// It subscribes to the current running effect.
    fn try_with<O>(&self, f: impl FnOnce(Option<&T>) -> O) -> O
    where
        T: 'static,
    {
        if let Some(signal) = self.id().signal() {
            signal.with(|v| f(Some(v)))
        } else {
            f(None)
        }
    }
}
