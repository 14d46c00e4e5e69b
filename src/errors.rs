// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
use error_chain::*;
pub use error_chain::bail;

error_chain! {
    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("maze dimensions must be at least 1x1")
            display("invalid maze dimensions {}x{}: width and height must be at least 1", width, height)
        }
        DimensionsTooLarge(width: usize, height: usize) {
            description("maze dimensions are too large")
            display("maze dimensions {}x{} are too large to address every cell", width, height)
        }
    }
}
