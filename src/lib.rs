pub use migrad_internal::*;
