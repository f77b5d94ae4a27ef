//! Type-erased owner of a concrete message.
//!
//! [`AnyBox`] gives code that only knows `dyn Message` equality, hashing,
//! cloning and downcasting. Each concrete type gets one [`MessageBox`]
//! implementation through the generic `ConcreteBox<M>`.

use crate::message::{Message, NamedMessage};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Operations every boxed message supports
pub(crate) trait MessageBox: Send + Sync {
    fn message(&self) -> &dyn Message;
    fn message_mut(&mut self) -> &mut dyn Message;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn MessageBox>;
    /// `None` when `other` holds a different concrete type
    fn is_equal(&self, other: &dyn MessageBox) -> Option<bool>;
    fn hash_into(&self, state: &mut dyn Hasher);
}

struct ConcreteBox<M>(M);

impl<M: NamedMessage> MessageBox for ConcreteBox<M> {
    fn message(&self) -> &dyn Message {
        &self.0
    }

    fn message_mut(&mut self) -> &mut dyn Message {
        &mut self.0
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        Box::new(self.0)
    }

    fn clone_box(&self) -> Box<dyn MessageBox> {
        Box::new(ConcreteBox(self.0.clone()))
    }

    fn is_equal(&self, other: &dyn MessageBox) -> Option<bool> {
        other
            .message()
            .as_any()
            .downcast_ref::<M>()
            .map(|other| self.0 == *other)
    }

    fn hash_into(&self, mut state: &mut dyn Hasher) {
        self.0.hash(&mut state);
    }
}

/// A message of some concrete type, handled through `dyn Message`
pub struct AnyBox {
    inner: Box<dyn MessageBox>,
}

impl AnyBox {
    /// Boxes `message`
    pub fn new<M: NamedMessage>(message: M) -> Self {
        Self {
            inner: Box::new(ConcreteBox(message)),
        }
    }

    /// The wrapped message
    pub fn message(&self) -> &dyn Message {
        self.inner.message()
    }

    /// The wrapped message, mutably
    pub fn message_mut(&mut self) -> &mut dyn Message {
        self.inner.message_mut()
    }

    /// Full name of the wrapped message type
    pub fn full_name(&self) -> &'static str {
        self.message().full_name()
    }

    /// Borrows the message as `M`, or `None` if it is another type
    pub fn downcast_ref<M: NamedMessage>(&self) -> Option<&M> {
        self.message().as_any().downcast_ref()
    }

    /// Mutably borrows the message as `M`, or `None` if it is another type
    pub fn downcast_mut<M: NamedMessage>(&mut self) -> Option<&mut M> {
        self.message_mut().as_any_mut().downcast_mut()
    }

    /// Unwraps the message as `M`, or `None` if it is another type
    pub fn into_inner<M: NamedMessage>(self) -> Option<M> {
        self.inner.into_any().downcast::<M>().ok().map(|m| *m)
    }

    /// Compares two boxes.
    ///
    /// Returns `None` when they hold different concrete types, which callers
    /// should treat as unequal.
    pub fn is_equal(&self, other: &AnyBox) -> Option<bool> {
        self.inner.is_equal(other.inner.as_ref())
    }
}

impl Clone for AnyBox {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for AnyBox {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other).unwrap_or(false)
    }
}

impl Hash for AnyBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash_into(state);
    }
}

impl fmt::Debug for AnyBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyBox").field(&self.message()).finish()
    }
}
