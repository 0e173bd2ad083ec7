//! Cancellation flag shared between the controller and one session attempt

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let seen_by_loop = token.clone();
        assert!(!seen_by_loop.is_cancelled());
        token.cancel();
        assert!(seen_by_loop.is_cancelled());
    }

    #[test]
    fn test_new_token_is_independent() {
        let old = CancelToken::new();
        old.cancel();
        assert!(!CancelToken::new().is_cancelled());
    }
}
