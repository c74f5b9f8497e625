pub(super) mod conversation;
pub(super) mod core;
pub(super) mod model;
pub(super) mod persona;
pub(super) mod session;

use crate::commands::error::CommandError;
use crate::commands::registry::CommandInvocation;

pub(super) fn required_arg<'a>(
    invocation: &CommandInvocation<'a>,
    index: usize,
    usage: &'static str,
) -> Result<&'a str, CommandError> {
    invocation.arg(index).ok_or(CommandError::Usage(usage))
}
