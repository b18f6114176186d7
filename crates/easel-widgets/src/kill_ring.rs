//! Kill ring shared by every edit box.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

thread_local! {
    static SHARED: KillRing = KillRing::new();
}

/// Text most recently cut with a kill command, waiting to be yanked.
///
/// Cloning yields another handle to the same buffer. Widgets normally use
/// [`KillRing::shared`], so text killed in one box can be yanked into any
/// other on the same UI thread.
#[derive(Clone, Default)]
pub struct KillRing {
    text: Rc<RefCell<Vec<char>>>,
}

impl KillRing {
    /// An isolated ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide ring of the current UI thread.
    pub fn shared() -> Self {
        SHARED.with(Clone::clone)
    }

    /// Store killed text. A continuation appends to the previous kill
    /// instead of replacing it.
    pub fn kill(&self, killed: &[char], continuation: bool) {
        let mut text = self.text.borrow_mut();
        if !continuation {
            text.clear();
        }
        text.extend_from_slice(killed);
    }

    pub fn contents(&self) -> Vec<char> {
        self.text.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.text.borrow().iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.text.borrow_mut().clear();
    }

    /// True if both handles refer to the same ring.
    pub fn same_ring(&self, other: &KillRing) -> bool {
        Rc::ptr_eq(&self.text, &other.text)
    }
}

impl fmt::Debug for KillRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KillRing").field(&self.text()).finish()
    }
}
