/// Packed stream inspection command.
pub mod inspect;
/// JSON to packed stream conversion command.
pub mod pack;
/// Dynamic value tree rendering.
pub mod print;

pub(crate) mod json;
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
