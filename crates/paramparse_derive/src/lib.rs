//! Derive macro for `paramparse::Record`, used through the `paramparse` re-export.
//!
//! Each field of the struct is given a binding by attribute, and bindings are chained in
//! declaration order:
//! ```ignore
//! #[derive(Record, Default)]
//! struct Transport {
//!     #[anchor("RTP/AVP")]
//!     #[rule(optional(int()))]
//!     port: Option<i32>,
//!     #[embed]
//!     mode: Mode,
//!     #[skip]
//!     seen: bool,
//! }
//! ```
use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;

mod record;

#[proc_macro_error]
#[proc_macro_derive(Record, attributes(rule, anchor, embed, skip))]
pub fn derive_record(tokens: TokenStream) -> TokenStream {
    match record::derive(tokens.into()) {
        Ok(ts) => ts.into(),
        Err(es) => {
            for e in es {
                e.emit();
            }
            TokenStream::new()
        }
    }
}
