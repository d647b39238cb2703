use super::{Mailbox, Tuner};
use crate::Schema::TuningMessage;
use std::fmt;

// Debug proxy implementations that call the standalone debug functions
impl<F: TuningMessage> fmt::Debug for Mailbox<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_mailbox(self, f)
    }
}

impl<F: TuningMessage, A: TuningMessage> fmt::Debug for Tuner<F, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_tuner(self, f)
    }
}
