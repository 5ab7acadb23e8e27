//! Clipboard abstraction for the "Copy as json" action.

use crate::error::Result;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}
