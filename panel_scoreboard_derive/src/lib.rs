mod field_list;
mod helper;

use field_list::impl_field_list;
use proc_macro::TokenStream;

/// Derives `FieldList`, the comma separated column list of a row struct.
///
/// Field names are used as column names unless `#[column(rename = "...")]` is given.
#[proc_macro_derive(FieldList, attributes(column))]
pub fn derive_field_list(input: TokenStream) -> TokenStream {
    impl_field_list(input.into()).into()
}
