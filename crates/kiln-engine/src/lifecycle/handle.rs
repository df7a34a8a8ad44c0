use std::fmt;
use std::num::NonZeroU64;

/// Opaque identifier for a resource owned by an external library.
///
/// The lifecycle core only tracks presence/absence of a resource; what the id
/// refers to is known exclusively to the collaborator that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawHandle(NonZeroU64);

impl RawHandle {
    pub fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic issuer of [`RawHandle`]s for collaborator implementations.
#[derive(Debug)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> RawHandle {
        let id = NonZeroU64::new(self.next).unwrap_or(NonZeroU64::MIN);
        self.next = self.next.wrapping_add(1).max(1);
        RawHandle(id)
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(RawHandle);

        impl $name {
            /// Wraps an id issued by the owning collaborator.
            pub fn from_raw(raw: RawHandle) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> RawHandle {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", stringify!($name), self.0)
            }
        }
    };
}

typed_handle!(
    /// Handle to a native window (surface + input source).
    ///
    /// Only the window collaborator that issued it can resolve it to a platform
    /// window; see `WinitWindowSystem::window` for the winit conversion.
    WindowHandle
);

typed_handle!(
    /// Handle to an immediate-mode UI context.
    UiContextHandle
);

typed_handle!(
    /// Handle to a render backend attached to a window + UI context pair.
    RenderBackendHandle
);
