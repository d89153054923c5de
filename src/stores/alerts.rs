use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::errors::ProfileError;

/// Something that can put an alert in front of the user (the active router)
pub trait AlertListener {
    fn show_alert(&self, title: &str, message: &str);
}

/// Global exception handler. The most recently registered listener wins.
#[derive(Clone, Default)]
pub struct AlertManager {
    listener: Rc<RefCell<Option<Weak<dyn AlertListener>>>>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_alert_listener(&self, listener: &Rc<dyn AlertListener>) {
        *self.listener.borrow_mut() = Some(Rc::downgrade(listener));
    }

    fn listener(&self) -> Option<Rc<dyn AlertListener>> {
        self.listener.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Surface an error to the user
    pub fn handle(&self, error: &ProfileError) {
        match self.listener() {
            Some(listener) => listener.show_alert(error.title(), &error.to_string()),
            None => log::warn!("No alert listener registered, dropping: {}", error),
        }
    }
}
